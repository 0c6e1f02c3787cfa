use futures::stream::{Stream, StreamExt};
use shared::{ClientConfig, DownMsg, UpMsg};
use zoon::*;

/// Relay-style adapter over the moon connection: down messages arrive on a
/// stream instead of inside the connection callback.
pub struct ConnectionAdapter {
    connection: Connection<UpMsg, DownMsg>,
}

impl ConnectionAdapter {
    pub fn new() -> (Self, impl Stream<Item = DownMsg>) {
        let (message_sender, message_stream) = futures::channel::mpsc::unbounded();

        let connection = Connection::new(move |down_msg, _| {
            let _ = message_sender.unbounded_send(down_msg);
        });

        (ConnectionAdapter { connection }, message_stream)
    }

    pub async fn send_up_msg(&self, up_msg: UpMsg) -> Result<(), String> {
        self.connection
            .send_up_msg(up_msg)
            .await
            .map(|_| ())
            .map_err(|error| format!("Failed to send message: {error:?}"))
    }
}

/// Asks the backend for the client configuration and waits for the answer.
pub async fn load_client_config(
    connection: &ConnectionAdapter,
    down_msgs: &mut (impl Stream<Item = DownMsg> + Unpin),
) -> Result<ClientConfig, String> {
    connection.send_up_msg(UpMsg::LoadConfig).await?;
    match down_msgs.next().await {
        Some(DownMsg::ConfigLoaded(config)) => Ok(config),
        Some(DownMsg::ConfigError(error)) => Err(error),
        None => Err("connection closed before the configuration arrived".to_string()),
    }
}
