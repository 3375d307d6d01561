use std::path::PathBuf;

const DATA_DIR_NAME: &str = "usage-insights";

pub fn resolve_data_dir() -> Result<PathBuf, String> {
    dirs::data_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .ok_or_else(|| "could not resolve the user data directory".to_string())
}
