//! Naming rules for uploaded artifacts.

use uuid::Uuid;

/// Extracts the team name from a submission filename of the form
/// `<team>_<hackathon>.<ext>`.
pub fn extract_team_name(filename: &str, hackathon_name: &str) -> Result<String, String> {
    let marker = format!("_{}.", hackathon_name);
    let invalid = || format!("Invalid filename format: {}", filename);

    let (team, _) = filename.split_once(&marker).ok_or_else(invalid)?;
    let team = team.trim();
    if team.is_empty() {
        return Err(invalid());
    }

    Ok(team.to_string())
}

/// Builds a collision-free object key that keeps the original base name readable.
pub fn object_key_for(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name)
        .chars()
        .map(|c| if c.is_control() || c == '"' { '_' } else { c })
        .collect::<String>();

    format!("{}-{}", Uuid::new_v4().simple(), base)
}
