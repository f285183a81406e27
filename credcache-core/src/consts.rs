//! Constants for credcache
//!
//! Environment variable names, on-disk naming conventions and default values
//! shared by the library and the command-line tool.

/// Environment variable overriding the default credential store directory
pub const ENV_STORE_PATH: &str = "CREDCACHE_STORE_PATH";

/// Environment variable overriding the location of the Unix protection key
pub const ENV_KEY_FILE: &str = "CREDCACHE_KEY_FILE";

/// Name of the default store directory under the user's home directory
pub const DEFAULT_STORE_DIR_NAME: &str = "Credentials";

/// Extension of the plaintext username artifact
pub const USERNAME_EXTENSION: &str = "username";

/// Extension of the encrypted secret artifact
pub const PASSWORD_EXTENSION: &str = "password";

/// File name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// File name of the Unix protection key inside the data directory
pub const KEY_FILE_NAME: &str = "protection.key";

/// Application name used to derive platform project directories
pub const APPLICATION: &str = "credcache";
