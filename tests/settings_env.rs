use std::{
    env, fs,
    sync::{Mutex, OnceLock},
};

use rl_catalog::{Catalog, CatalogSettings, EncoderConfig, Space};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

#[derive(Default)]
struct EnvOverride {
    previous: Vec<(String, Option<String>)>,
}

impl EnvOverride {
    fn set(&mut self, key: &str, value: &str) {
        if !self.previous.iter().any(|(existing, _)| existing == key) {
            self.previous.push((key.to_string(), env::var(key).ok()));
        }
        env::set_var(key, value);
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..).rev() {
            match value {
                Some(value) => env::set_var(&key, value),
                None => env::remove_var(&key),
            }
        }
    }
}

#[test]
fn test_environment_overrides_files() {
    let _guard = env_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("default.toml"),
        "[model]\nfcnet_hiddens = [64, 32]\nuse_lstm = false\n",
    )
    .unwrap();

    let mut env = EnvOverride::default();
    env.set("RL_CATALOG_MODEL__USE_LSTM", "true");
    env.set("RL_CATALOG_MODEL__LSTM_CELL_SIZE", "24");

    let settings = CatalogSettings::load_from(dir.path()).unwrap();
    assert_eq!(settings.model.use_lstm, Some(true));
    assert_eq!(settings.model.lstm_cell_size, Some(24));

    let catalog =
        Catalog::new(Space::box_f32([5]), Space::discrete(2), &settings.model, None).unwrap();
    assert!(matches!(catalog.encoder_config(), EncoderConfig::Lstm(_)));
    assert_eq!(catalog.latent_dim(), 24);
}

#[test]
fn test_environment_selects_profile_file() {
    let _guard = env_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("default.toml"), "[model]\nfcnet_hiddens = [64]\n").unwrap();
    fs::write(dir.path().join("atari.toml"), "[model]\nfcnet_hiddens = [512]\n").unwrap();

    let mut env = EnvOverride::default();
    env.set("RL_CATALOG_ENV", "atari");

    let settings = CatalogSettings::load_from(dir.path()).unwrap();
    assert_eq!(settings.model.fcnet_hiddens, Some(vec![512]));
}
