use armis_core::reading::FieldAliases;
use armis_core::risk::RiskPolicy;
use armis_core::triggers::TriggerThresholds;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`, the port field devices are flashed with).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight alert dispatches (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Per-notifier dispatch timeout in seconds (default: `10`).
    pub notify_timeout_secs: u64,
    /// Bearer token required by dashboard endpoints. `None` leaves them open.
    pub dashboard_token: Option<String>,
    /// Scoring policy used by the risk endpoints.
    pub risk_policy: RiskPolicy,
    /// Predicates used to decide which alerts an upload raises.
    pub trigger_thresholds: TriggerThresholds,
    /// Producer field name -> canonical field name.
    pub field_aliases: FieldAliases,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `10`                       |
    /// | `NOTIFY_TIMEOUT_SECS`  | `10`                       |
    /// | `DASHBOARD_TOKEN`      | unset                      |
    /// | `RISK_POLICY`          | `weighted`                 |
    /// | `RISK_POLICY_FILE`     | unset (overrides `RISK_POLICY`) |
    /// | `FIELD_ALIASES`        | unset (`Alias=field,...`)  |
    ///
    /// Panics on invalid values; misconfiguration should fail at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let notify_timeout_secs: u64 = std::env::var("NOTIFY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("NOTIFY_TIMEOUT_SECS must be a valid u64");

        let dashboard_token = std::env::var("DASHBOARD_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let risk_policy = match std::env::var("RISK_POLICY_FILE") {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)
                    .unwrap_or_else(|e| panic!("Cannot read RISK_POLICY_FILE '{path}': {e}"));
                RiskPolicy::from_json(&json)
                    .unwrap_or_else(|e| panic!("Invalid risk policy in '{path}': {e}"))
            }
            Err(_) => {
                let name = std::env::var("RISK_POLICY").unwrap_or_else(|_| "weighted".into());
                RiskPolicy::preset(&name).unwrap_or_else(|e| panic!("{e}"))
            }
        };

        let field_aliases = match std::env::var("FIELD_ALIASES") {
            Ok(overrides) => FieldAliases::default()
                .with_overrides(&overrides)
                .unwrap_or_else(|e| panic!("Invalid FIELD_ALIASES: {e}")),
            Err(_) => FieldAliases::default(),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            notify_timeout_secs,
            dashboard_token,
            risk_policy,
            trigger_thresholds: TriggerThresholds::default(),
            field_aliases,
        }
    }
}
