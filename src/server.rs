use std::net::SocketAddr;
use std::path::Path;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument};

use crate::aof::Aof;
use crate::commands::{Command, CommandParserError, Mutation};
use crate::connection::Connection;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Boots the engine and serves until ctrl-c: open the append-only file,
/// replay it into a fresh store, then accept connections, one task each.
pub async fn run(port: u16, aof_path: impl AsRef<Path>) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let store = Store::new();
    let aof = Aof::open(aof_path).await?;

    // State must be fully reconstructed before the first client is let in.
    aof.replay(&store).await?;

    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Server listening on {}", listener.local_addr()?);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, client_address) = accepted?;
                let store = store.clone();
                let aof = aof.clone();
                info!("Accepted connection from {:?}", client_address);

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(socket, client_address, store, aof).await {
                        error!("Connection error: {}", e);
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down, syncing append-only file");
                aof.sync().await?;
                return Ok(());
            }
        }
    }
}

#[instrument(
    name = "connection",
    skip(stream, store, aof),
    fields(connection_id, client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    store: Store,
    aof: Aof,
) -> Result<(), Error> {
    let mut conn = Connection::new(stream);

    tracing::Span::current()
        .record("connection_id", conn.id.to_string())
        .record("client_address", client_address.to_string());

    while let Some(frame) = conn.read_frame().await? {
        debug!("Received frame from client: {:?}", frame);

        let response = match Command::try_from(frame.clone()) {
            Ok(cmd) => match cmd.mutation() {
                Mutation::Never => cmd.exec(store.clone()).await?,
                mutation => {
                    // The log lock is held across the mutation so records
                    // land in the order writes become visible; two writers
                    // racing on one key cannot commit in one order and
                    // append in the other.
                    let mut log = aof.lock().await;
                    let response = cmd.exec(store.clone()).await?;

                    if should_append(mutation, &response) {
                        // The mutation has already committed; an append
                        // failure costs durability, not correctness.
                        // Surface it to the operator and keep serving.
                        if let Err(e) = log.append(&frame).await {
                            error!("Failed to append to the append-only file: {}", e);
                        }
                    }
                    response
                }
            },
            Err(err) => match err.downcast_ref::<CommandParserError>() {
                // Argument-level problems are reported to the client; the
                // connection stays open.
                Some(parse_err) if !parse_err.is_protocol_error() => {
                    Frame::Error(parse_err.to_string())
                }
                // A malformed request is fatal to this connection only.
                _ => return Err(err),
            },
        };

        debug!("Sending response to client: {:?}", response);
        conn.write_frame(&response).await?;
    }

    info!("Connection closed");
    Ok(())
}

/// The append allow-list, applied after execution so that conditional
/// mutations (a `DEL` of nothing, an `EXPIRE` that did not apply, a pop
/// from an empty list) do not grow the log.
fn should_append(mutation: Mutation, response: &Frame) -> bool {
    match mutation {
        Mutation::Never => false,
        Mutation::Always => !matches!(response, Frame::Error(_)),
        Mutation::IfEffective => match response {
            Frame::Integer(n) => *n > 0,
            Frame::Bulk(_) | Frame::Array(_) => true,
            _ => false,
        },
    }
}
