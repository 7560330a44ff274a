//! UDP multicast channel.
//!
//! Each record travels as one JSON datagram (`{"key":..,"payload":..}`) to
//! the configured group. Multicast loopback is enabled so a master receives
//! its own publications, and receive sockets share the port
//! (`SO_REUSEADDR`/`SO_REUSEPORT`) so several masters can run on one host.

use async_trait::async_trait;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use tokio::net::UdpSocket;
use tracing::{debug, info};

use paramsync_types::{ChannelError, EncodedRecord, TransportConfig};

use super::{ParamChannel, RecordSubscription};

/// Largest record we are willing to put in a single datagram.
pub const MAX_DATAGRAM_BYTES: usize = 65_000;

const RECV_BUFFER_BYTES: usize = 65_536;

#[derive(Debug)]
pub struct UdpMulticast {
    sender: UdpSocket,
    group: SocketAddrV4,
    interface: Ipv4Addr,
}

impl UdpMulticast {
    /// Open the sending socket. Must be called inside a tokio runtime.
    pub fn open(config: &TransportConfig) -> Result<Self, ChannelError> {
        let group = SocketAddrV4::new(config.multicast_group, config.port);
        let socket = new_socket()?;
        socket.set_multicast_loop_v4(true).map_err(|e| ChannelError::from_io_error(&e))?;
        if !config.interface.is_unspecified() {
            socket
                .set_multicast_if_v4(&config.interface)
                .map_err(|e| ChannelError::from_io_error(&e))?;
        }
        let local = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
        socket.bind(&SockAddr::from(local)).map_err(|e| ChannelError::from_io_error(&e))?;

        let sender = into_tokio(socket)?;
        info!("Multicast channel ready on {} (interface {})", group, config.interface);
        Ok(Self { sender, group, interface: config.interface })
    }

    pub fn group(&self) -> SocketAddrV4 {
        self.group
    }
}

#[async_trait]
impl ParamChannel for UdpMulticast {
    async fn publish(&self, record: &EncodedRecord) -> Result<(), ChannelError> {
        let bytes = serde_json::to_vec(record)
            .map_err(|e| ChannelError::Serialize { message: e.to_string() })?;
        if bytes.len() > MAX_DATAGRAM_BYTES {
            return Err(ChannelError::Oversized {
                key: record.key.clone(),
                size: bytes.len(),
                limit: MAX_DATAGRAM_BYTES,
            });
        }
        self.sender
            .send_to(&bytes, SocketAddr::V4(self.group))
            .await
            .map_err(|e| ChannelError::from_io_error(&e))?;
        Ok(())
    }

    async fn subscribe(&self) -> Result<Box<dyn RecordSubscription>, ChannelError> {
        let socket = new_socket()?;
        socket.set_reuse_address(true).map_err(|e| ChannelError::from_io_error(&e))?;
        #[cfg(unix)]
        socket.set_reuse_port(true).map_err(|e| ChannelError::from_io_error(&e))?;

        let local = SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.group.port()));
        socket.bind(&SockAddr::from(local)).map_err(|e| ChannelError::from_io_error(&e))?;
        socket
            .join_multicast_v4(self.group.ip(), &self.interface)
            .map_err(|e| ChannelError::from_io_error(&e))?;

        let socket = into_tokio(socket)?;
        debug!("Joined multicast group {}", self.group);
        Ok(Box::new(UdpSubscription { socket, buffer: vec![0; RECV_BUFFER_BYTES] }))
    }
}

struct UdpSubscription {
    socket: UdpSocket,
    buffer: Vec<u8>,
}

#[async_trait]
impl RecordSubscription for UdpSubscription {
    async fn recv(&mut self) -> Result<Option<EncodedRecord>, ChannelError> {
        loop {
            let (len, from) = self
                .socket
                .recv_from(&mut self.buffer)
                .await
                .map_err(|e| ChannelError::from_io_error(&e))?;
            match serde_json::from_slice::<EncodedRecord>(&self.buffer[..len]) {
                Ok(record) => return Ok(Some(record)),
                Err(e) => debug!("Dropping undecodable datagram from {}: {}", from, e),
            }
        }
    }
}

fn new_socket() -> Result<Socket, ChannelError> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(|e| ChannelError::from_io_error(&e))?;
    socket.set_nonblocking(true).map_err(|e| ChannelError::from_io_error(&e))?;
    Ok(socket)
}

fn into_tokio(socket: Socket) -> Result<UdpSocket, ChannelError> {
    UdpSocket::from_std(socket.into()).map_err(|e| ChannelError::from_io_error(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config(port: u16) -> TransportConfig {
        TransportConfig { port, ..TransportConfig::default() }
    }

    #[tokio::test]
    async fn test_oversized_record_is_rejected() {
        let channel = UdpMulticast::open(&test_config(17_401)).unwrap();
        let record = EncodedRecord::new("/big", "x".repeat(MAX_DATAGRAM_BYTES));

        match channel.publish(&record).await {
            Err(ChannelError::Oversized { key, size, limit }) => {
                assert_eq!(key, "/big");
                assert!(size > limit);
            }
            other => panic!("expected Oversized, got {:?}", other),
        }
    }

    #[tokio::test]
    #[ignore = "requires a multicast-capable interface"]
    async fn test_multicast_loopback_delivers_own_record() {
        let channel = UdpMulticast::open(&test_config(17_402)).unwrap();
        let mut sub = channel.subscribe().await.unwrap();
        let record = EncodedRecord::new("/robot/gain", "{\"int\":3}");

        channel.publish(&record).await.unwrap();

        let received = tokio::time::timeout(Duration::from_secs(2), sub.recv()).await.unwrap();
        assert_eq!(received.unwrap(), Some(record));
    }
}
