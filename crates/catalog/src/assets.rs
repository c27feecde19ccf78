use crate::types::{Exercise, SessionDef, SessionSummary};
use crate::CatalogError;
use rust_embed::RustEmbed;

/// Session and exercise definitions shipped inside the binary. The
/// catalog is versioned with the code: a deploy is the only way content
/// changes, so resolution stays reproducible.
#[derive(RustEmbed)]
#[folder = "catalog/"]
struct CatalogAssets;

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, CatalogError> {
    let file =
        CatalogAssets::get(path).ok_or_else(|| CatalogError::MissingAsset(path.to_string()))?;
    serde_json::from_slice(file.data.as_ref()).map_err(|source| CatalogError::CorruptAsset {
        path: path.to_string(),
        source,
    })
}

pub fn load_exercises() -> Result<Vec<Exercise>, CatalogError> {
    read_json("exercises.json")
}

pub fn load_session(session_id: &str) -> Result<SessionDef, CatalogError> {
    let path = format!("sessions/{session_id}.json");
    if CatalogAssets::get(&path).is_none() {
        return Err(CatalogError::SessionNotFound(session_id.to_string()));
    }
    read_json(&path)
}

pub fn list_sessions() -> Result<Vec<SessionSummary>, CatalogError> {
    let mut paths: Vec<String> = CatalogAssets::iter()
        .filter(|p| p.starts_with("sessions/") && p.ends_with(".json"))
        .map(|p| p.to_string())
        .collect();
    paths.sort();

    let mut sessions = Vec::with_capacity(paths.len());
    for path in paths {
        let def: SessionDef = read_json(&path)?;
        sessions.push(SessionSummary {
            id: def.session_id,
            name: def.session_name,
            session_type: def.session_type,
            tags: def.tags,
        });
    }
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_embedded_session_parses() {
        let sessions = list_sessions().unwrap();
        assert!(sessions.len() >= 13);
        for summary in &sessions {
            let def = load_session(&summary.id).unwrap();
            assert_eq!(def.session_id, summary.id);
            assert!(!def.blocks.is_empty(), "{} has no blocks", summary.id);
        }
    }

    #[test]
    fn exercises_parse_and_have_ids() {
        let exercises = load_exercises().unwrap();
        assert!(exercises.len() >= 20);
        assert!(exercises.iter().all(|e| !e.exercise_id.is_empty()));
    }

    #[test]
    fn unknown_session_is_a_not_found_error() {
        assert!(matches!(
            load_session("campus_death_route"),
            Err(CatalogError::SessionNotFound(_))
        ));
    }
}
