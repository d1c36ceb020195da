//! Settings read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.

use std::env;
use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_API_URL;

/// Reads typed values from environment variables, with an optional prefix.
#[derive(Debug, Clone, Default)]
pub struct Env {
	/// Prepended to every key, e.g. `STAGING_`.
	pub prefix: Option<String>,
}

impl Env {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	fn get_key_name(&self, key: &str) -> String {
		match &self.prefix {
			Some(prefix) => format!("{prefix}{key}"),
			None => key.to_string(),
		}
	}

	pub fn str(&self, key: &str) -> Result<String, EnvError> {
		self.str_with_default(key, None)
	}

	pub fn str_with_default(&self, key: &str, default: Option<&str>) -> Result<String, EnvError> {
		let full_key = self.get_key_name(key);
		validate_env_var_name(&full_key)?;

		match env::var(&full_key) {
			Ok(val) => Ok(val),
			Err(_) => default
				.map(str::to_string)
				.ok_or(EnvError::MissingVariable(full_key)),
		}
	}

	/// An unset variable is `None`; a set one must be valid.
	pub fn optional_str(&self, key: &str) -> Result<Option<String>, EnvError> {
		match self.str(key) {
			Ok(val) => Ok(Some(val)),
			Err(EnvError::MissingVariable(_)) => Ok(None),
			Err(err) => Err(err),
		}
	}

	pub fn int_with_default(&self, key: &str, default: Option<i64>) -> Result<i64, EnvError> {
		let full_key = self.get_key_name(key);
		validate_env_var_name(&full_key)?;

		match env::var(&full_key) {
			Ok(val) => val.trim().parse::<i64>().map_err(|e| EnvError::ParseError {
				key: full_key,
				value_len: val.len(),
				error: e.to_string(),
			}),
			Err(_) => default.ok_or(EnvError::MissingVariable(full_key)),
		}
	}

	/// Reads a TCP port.
	pub fn port_with_default(&self, key: &str, default: u16) -> Result<u16, EnvError> {
		let value = self.int_with_default(key, Some(i64::from(default)))?;
		u16::try_from(value).map_err(|e| EnvError::ParseError {
			key: self.get_key_name(key),
			value_len: value.to_string().len(),
			error: e.to_string(),
		})
	}
}

/// Rejects names that are empty, contain control characters or `=`.
pub fn validate_env_var_name(name: &str) -> Result<(), EnvError> {
	let reason = if name.is_empty() {
		"environment variable name must not be empty".to_string()
	} else if let Some(pos) = name.find(char::is_control) {
		format!("environment variable name contains control character at position {pos}")
	} else if name.contains('=') {
		"environment variable name must not contain '='".to_string()
	} else {
		return Ok(());
	};
	Err(EnvError::InvalidVariableName {
		name: name.to_string(),
		reason,
	})
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EnvError {
	/// The variable is unset and has no default.
	#[error("Missing environment variable: {0}")]
	MissingVariable(String),

	/// The variable is set to something that does not parse.
	#[error("Failed to parse environment variable '{key}' (value length: {value_len}): {error}")]
	ParseError {
		key: String,
		/// Length of the raw value, which is never echoed.
		value_len: usize,
		error: String,
	},

	/// The key itself cannot name an environment variable.
	#[error("Invalid environment variable name '{name}': {reason}")]
	InvalidVariableName { name: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SettingsError {
	/// A variable holds an invalid value.
	#[error("invalid setting: {0}")]
	Parse(#[source] EnvError),

	/// A variable could not be read.
	#[error(transparent)]
	Env(EnvError),
}

impl From<EnvError> for SettingsError {
	fn from(err: EnvError) -> Self {
		match err {
			EnvError::ParseError { .. } => Self::Parse(err),
			other => Self::Env(other),
		}
	}
}

/// Server and platform settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
	/// Bot token used for Web API calls.
	pub slack_token: String,
	/// Request signing secret. Loaded but not verified.
	pub signing_secret: Option<String>,
	pub ip: String,
	pub port: u16,
	/// Web API base URL.
	pub api_url: String,
	/// Default log filter when `RUST_LOG` is unset.
	pub log: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			slack_token: String::new(),
			signing_secret: None,
			ip: "127.0.0.1".to_string(),
			port: 3000,
			api_url: DEFAULT_API_URL.to_string(),
			log: "info".to_string(),
		}
	}
}

impl Settings {
	/// Loads `.env` if present, then reads unprefixed variables.
	pub fn from_env() -> Result<Self, SettingsError> {
		dotenv::dotenv().ok();
		Self::from_env_with(&Env::new())
	}

	pub fn from_env_with(env: &Env) -> Result<Self, SettingsError> {
		let defaults = Self::default();
		Ok(Self {
			slack_token: env.str_with_default("SLACK_TOKEN", Some(""))?,
			signing_secret: env.optional_str("SLACK_SIGNING_SECRET")?,
			ip: env.str_with_default("DIALOG_IP", Some(&defaults.ip))?,
			port: env.port_with_default("DIALOG_PORT", defaults.port)?,
			api_url: env.str_with_default("DIALOG_API_URL", Some(&defaults.api_url))?,
			log: env.str_with_default("DIALOG_LOG", Some(&defaults.log))?,
		})
	}

	/// Address the server binds to.
	pub fn addr(&self) -> Result<SocketAddr, SettingsError> {
		let ip: IpAddr = self.ip.parse().map_err(|e: std::net::AddrParseError| {
			SettingsError::Parse(EnvError::ParseError {
				key: "DIALOG_IP".to_string(),
				value_len: self.ip.len(),
				error: e.to_string(),
			})
		})?;
		Ok(SocketAddr::new(ip, self.port))
	}
}
