use hickory_server::ServerFuture;
use ingress_dns_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const RECV_BUFFER_SIZE: usize = 4096;
/// Datagrams being answered at once; the socket is not read while saturated.
const MAX_IN_FLIGHT: usize = 1024;

/// Serve UDP on `bind_addr`, plus TCP when `tcp_timeout` is set.
pub async fn start_dns_server(
    bind_addr: String,
    handler: DnsServerHandler,
    tcp_timeout: Option<Duration>,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let mut join_set: JoinSet<()> = JoinSet::new();

    let udp_socket = Arc::new(create_udp_socket(domain, socket_addr)?);
    let handler_udp = Arc::new(handler.clone());
    let in_flight = Arc::new(Semaphore::new(MAX_IN_FLIGHT));
    join_set.spawn(async move {
        run_udp_loop(udp_socket, handler_udp, in_flight).await;
    });

    if let Some(timeout) = tcp_timeout {
        let tcp_listener = create_tcp_listener(domain, socket_addr)?;
        join_set.spawn(async move {
            let mut server = ServerFuture::new(handler);
            server.register_listener(tcp_listener, timeout);
            if let Err(e) = server.block_until_done().await {
                error!(error = %e, "TCP DNS listener error");
            }
        });
    }

    info!(
        bind_address = %socket_addr,
        tcp = tcp_timeout.is_some(),
        "DNS server ready"
    );

    while join_set.join_next().await.is_some() {}
    Ok(())
}

async fn run_udp_loop(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
    in_flight: Arc<Semaphore>,
) {
    let mut recv_buf = [0u8; RECV_BUFFER_SIZE];

    loop {
        let permit = match Arc::clone(&in_flight).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };

        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                // ICMP errors from earlier replies surface here on some platforms.
                warn!(error = %e, "UDP recv error");
                continue;
            }
        };

        let owned_buf: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = Arc::clone(&handler);
        let socket = Arc::clone(&socket);
        tokio::spawn(async move {
            if let Some(response) = handler.handle_datagram(&owned_buf).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    debug!(client = %from, error = %e, "Failed to send UDP reply");
                }
            }
            drop(permit);
        });
    }
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
