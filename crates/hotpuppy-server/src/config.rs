use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const SERVICE_NAME: &str = "hotpuppy";
pub const DEFAULT_SESSION_SECRET: &str = "hotpuppy-secret-key-change-in-production";

#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub image_model: String,
    pub debug: bool,
    pub session_secret: String,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            db_path: PathBuf::from("hotpuppy.db"),
            static_dir: PathBuf::from("static"),
            openai_api_key: None,
            openai_api_base: hotpuppy_core::providers::image::openai::DEFAULT_API_BASE.to_string(),
            image_model: hotpuppy_core::providers::image::openai::DEFAULT_MODEL.to_string(),
            debug: false,
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut cfg = Self::default();
        if let Some(v) = get("HOTPUPPY_BIND") {
            cfg.bind_addr = v;
        }
        if let Some(v) = get("HOTPUPPY_DB") {
            cfg.db_path = PathBuf::from(v);
        }
        if let Some(v) = get("HOTPUPPY_STATIC_DIR") {
            cfg.static_dir = PathBuf::from(v);
        }
        cfg.openai_api_key = get("OPENAI_API_KEY");
        if let Some(v) = get("OPENAI_API_BASE") {
            cfg.openai_api_base = v;
        }
        if let Some(v) = get("HOTPUPPY_IMAGE_MODEL") {
            cfg.image_model = v;
        }
        if let Some(v) = get("DEBUG") {
            cfg.debug = v.eq_ignore_ascii_case("true");
        }
        if let Some(v) = get("SESSION_SECRET") {
            cfg.session_secret = v;
        }
        cfg.log_level = match get("HOTPUPPY_LOG") {
            Some(v) => v,
            None if cfg.debug => "debug".to_string(),
            None => "info".to_string(),
        };
        cfg
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.bind_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid bind address {:?}: {e}", self.bind_addr))
    }

    pub fn uses_default_secret(&self) -> bool {
        self.session_secret == DEFAULT_SESSION_SECRET
    }
}

// Credentials never reach the logs.
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("db_path", &self.db_path)
            .field("static_dir", &self.static_dir)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("openai_api_base", &self.openai_api_base)
            .field("image_model", &self.image_model)
            .field("debug", &self.debug)
            .field("session_secret", &"<redacted>")
            .field("log_level", &self.log_level)
            .finish()
    }
}
