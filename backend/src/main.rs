use moon::*;
use shared::{ClientConfig, DownMsg, UpMsg};
use std::fs;

// ===== CENTRALIZED DEBUG FLAGS =====
const DEBUG_BACKEND: bool = false; // Request/response debugging

macro_rules! debug_log {
    ($flag:expr, $($arg:tt)*) => {
        if $flag {
            println!($($arg)*);
        }
    };
}

const CONFIG_FILE_PATH: &str = ".fishing_log.toml";

const LEAFLET_VERSION: &str = "1.9.4";

async fn frontend() -> Frontend {
    Frontend::new()
        .title("Fishing Log")
        .index_by_robots(false)
        .append_to_head(&format!(
            r#"<link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>"#
        ))
}

async fn up_msg_handler(req: UpMsgRequest<UpMsg>) {
    let (session_id, cor_id) = (req.session_id, req.cor_id);
    debug_log!(DEBUG_BACKEND, "Received {:?} from session {:?}", req.up_msg, session_id);

    match req.up_msg {
        UpMsg::LoadConfig => {
            let down_msg = match load_config() {
                Ok(config) => DownMsg::ConfigLoaded(config),
                Err(error) => {
                    eprintln!("Config error: {error}");
                    DownMsg::ConfigError(error)
                }
            };
            send_down_msg(down_msg, session_id, cor_id).await;
        }
    }
}

async fn send_down_msg(msg: DownMsg, session_id: SessionId, cor_id: CorId) {
    if let Some(session) = sessions::by_session_id().wait_for(session_id).await {
        session.send_down_msg(&msg, cor_id).await;
    } else {
        debug_log!(DEBUG_BACKEND, "Session {:?} gone before reply", session_id);
    }
}

/// Reads the client config, creating the file with defaults on first run.
fn load_config() -> Result<ClientConfig, String> {
    let mut config = match fs::read_to_string(CONFIG_FILE_PATH) {
        Ok(content) => ClientConfig::from_toml_str(&content).map_err(|e| e.to_string())?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            let config = ClientConfig::default();
            save_config_to_file(&config)
                .map_err(|e| format!("Failed to create default config: {e}"))?;
            config
        }
        Err(error) => return Err(format!("Failed to read {CONFIG_FILE_PATH}: {error}")),
    };

    let warnings = config.validate_and_fix();
    for warning in &warnings {
        println!("Config fixed: {warning}");
    }
    if !warnings.is_empty() {
        if let Err(error) = save_config_to_file(&config) {
            eprintln!("Failed to persist fixed config: {error}");
        }
    }

    Ok(config)
}

fn save_config_to_file(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let toml_content = config.to_toml_string()?;

    let content_with_header = format!(
        "# Fishing Log client configuration\n\
         # Catch API location, map tiles and map view defaults\n\
         \n\
         {}",
        toml_content
    );

    fs::write(CONFIG_FILE_PATH, content_with_header)?;
    Ok(())
}

#[moon::main]
async fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("BACKEND PANIC: {:?}", panic_info);
    }));

    start(frontend, up_msg_handler, |_| {}).await
}
