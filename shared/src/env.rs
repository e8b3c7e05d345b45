use std::str::FromStr;

use strum::EnumString;

#[derive(Default, EnumString, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

pub fn which() -> Environment {
    // デバッグビルドでは開発環境、リリースビルドでは本番環境を既定とする
    #[cfg(debug_assertions)]
    let default_env = Environment::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Environment::Production;

    match std::env::var("ENV") {
        Err(_) => default_env,
        Ok(v) => Environment::from_str(&v).unwrap_or(default_env),
    }
}
