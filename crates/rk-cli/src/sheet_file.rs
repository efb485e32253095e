//! A character service backed by one JSON file per character.

use std::fs;
use std::path::{Path, PathBuf};

use rk_mechanics::{Character, CharacterId, CharacterService, ServiceError, VitalsPatch};

/// Reads and writes a single character sheet on disk.
pub struct JsonFileCharacters {
    path: PathBuf,
}

impl JsonFileCharacters {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a brand-new sheet. Fails if the file already exists.
    pub fn create(path: &Path, character: &Character) -> Result<(), String> {
        if path.exists() {
            return Err(format!("'{}' already exists", path.display()));
        }
        write_sheet(path, character).map_err(|e| e.to_string())
    }

    /// Read the sheet without going through the engine.
    pub fn read(&self) -> Result<Character, ServiceError> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            ServiceError::Backend(format!("cannot read '{}': {e}", self.path.display()))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            ServiceError::Backend(format!("invalid sheet '{}': {e}", self.path.display()))
        })
    }
}

impl CharacterService for JsonFileCharacters {
    fn fetch_character_aggregate(&mut self, id: CharacterId) -> Result<Character, ServiceError> {
        let character = self.read()?;
        if character.id != id {
            return Err(ServiceError::CharacterNotFound(id));
        }
        Ok(character)
    }

    fn save_partial(
        &mut self,
        id: CharacterId,
        patch: &VitalsPatch,
    ) -> Result<Character, ServiceError> {
        let mut character = self.fetch_character_aggregate(id)?;
        patch.apply(&mut character.vitals);
        write_sheet(&self.path, &character)?;
        Ok(character)
    }
}

/// Write through a sibling temp file so a failed write never truncates the sheet.
fn write_sheet(path: &Path, character: &Character) -> Result<(), ServiceError> {
    let json = serde_json::to_string_pretty(character)
        .map_err(|e| ServiceError::Backend(format!("cannot encode sheet: {e}")))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json + "\n")
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|e| ServiceError::Backend(format!("cannot write '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_patch() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ilva.json");
        let character = Character::new("Ilva", 12, 10);
        JsonFileCharacters::create(&path, &character).unwrap();
        assert!(JsonFileCharacters::create(&path, &character).is_err());

        let mut service = JsonFileCharacters::new(&path);
        let saved = service
            .save_partial(
                character.id,
                &VitalsPatch {
                    current_hp: Some(4),
                    ..VitalsPatch::default()
                },
            )
            .unwrap();
        assert_eq!(saved.vitals.current_hp(), 4);
        assert_eq!(service.read().unwrap().vitals.current_hp(), 4);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn wrong_id_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ilva.json");
        JsonFileCharacters::create(&path, &Character::new("Ilva", 12, 10)).unwrap();
        let other = CharacterId::new();
        assert_eq!(
            JsonFileCharacters::new(&path).fetch_character_aggregate(other),
            Err(ServiceError::CharacterNotFound(other))
        );
    }

    #[test]
    fn missing_file_is_a_backend_error() {
        let mut service = JsonFileCharacters::new("/nonexistent/rk/sheet.json");
        assert!(matches!(
            service.fetch_character_aggregate(CharacterId::new()),
            Err(ServiceError::Backend(_))
        ));
    }
}
