use serde::{
    Deserialize,
    Serialize,
};

pub const SETTINGS_FILE: &str = "settings.json";

/// UI preferences kept between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsData {
    pub dark_mode: bool,
    pub sidebar_collapsed: bool,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self { dark_mode: true, sidebar_collapsed: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::DataDir;

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = DataDir::new(dir.path());
        std::fs::write(data_dir.file_path(SETTINGS_FILE), r#"{"sidebar_collapsed": true}"#).unwrap();

        let settings: SettingsData = data_dir.load_json_or_default(SETTINGS_FILE);
        assert!(settings.dark_mode);
        assert!(settings.sidebar_collapsed);
    }
}
