use rqlite_dns_infrastructure::dns::DnsRequestHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const MAX_UDP_REQUEST_SIZE: usize = 4096;

pub struct ServerOptions {
    pub udp_workers: usize,
    pub tcp_idle_timeout: Duration,
}

pub async fn start_dns_server(
    bind_addr: String,
    handler: Arc<DnsRequestHandler>,
    options: ServerOptions,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    info!(
        bind_address = %socket_addr,
        udp_workers = options.udp_workers,
        "Starting DNS server with SO_REUSEPORT"
    );

    let mut join_set: JoinSet<()> = JoinSet::new();

    for i in 0..options.udp_workers {
        let udp_socket = Arc::new(create_udp_socket(domain, socket_addr)?);
        let handler_udp = handler.clone();
        let shutdown_udp = shutdown.clone();
        join_set.spawn(async move {
            run_udp_worker(udp_socket, handler_udp, i, shutdown_udp).await;
        });
    }

    let tcp_listener = create_tcp_listener(domain, socket_addr)?;
    let handler_tcp = handler.clone();
    let shutdown_tcp = shutdown.clone();
    let idle_timeout = options.tcp_idle_timeout;
    join_set.spawn(async move {
        run_tcp_listener(tcp_listener, handler_tcp, idle_timeout, shutdown_tcp).await;
    });

    info!(
        "DNS server ready, {} UDP workers on {}",
        options.udp_workers, socket_addr
    );

    while join_set.join_next().await.is_some() {}
    info!("DNS server stopped");
    Ok(())
}

async fn run_udp_worker(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsRequestHandler>,
    worker_id: usize,
    shutdown: CancellationToken,
) {
    let mut recv_buf = [0u8; MAX_UDP_REQUEST_SIZE];

    loop {
        let (n, from) = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = socket.recv_from(&mut recv_buf) => match result {
                Ok(received) => received,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    // ICMP port unreachable from a previous reply surfaces here on some platforms.
                    debug!(worker = worker_id, error = %e, "UDP recv error");
                    continue;
                }
            },
        };

        let handler = handler.clone();
        let socket = socket.clone();
        let query: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        tokio::spawn(async move {
            if let Some(response) = handler.handle_udp(&query).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    debug!(client = %from, error = %e, "UDP send failed");
                }
            }
        });
    }
}

async fn run_tcp_listener(
    listener: TcpListener,
    handler: Arc<DnsRequestHandler>,
    idle_timeout: Duration,
    shutdown: CancellationToken,
) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = listener.accept() => match result {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "TCP accept failed");
                    continue;
                }
            },
        };

        let handler = handler.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_tcp_connection(stream, &handler, idle_timeout, shutdown).await {
                debug!(client = %peer, error = %e, "TCP connection closed with error");
            }
        });
    }
}

/// Serves length-prefixed messages until the peer closes, goes idle, or shutdown.
async fn serve_tcp_connection(
    mut stream: TcpStream,
    handler: &DnsRequestHandler,
    idle_timeout: Duration,
    shutdown: CancellationToken,
) -> io::Result<()> {
    stream.set_nodelay(true)?;

    loop {
        let mut len_buf = [0u8; 2];
        let read = tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            read = tokio::time::timeout(idle_timeout, stream.read_exact(&mut len_buf)) => read,
        };
        match read {
            Err(_) => return Ok(()),
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Ok(Err(e)) => return Err(e),
            Ok(Ok(_)) => {}
        }

        let len = u16::from_be_bytes(len_buf) as usize;
        let mut query = vec![0u8; len];
        tokio::time::timeout(idle_timeout, stream.read_exact(&mut query))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "incomplete TCP message"))??;

        let Some(response) = handler.handle_tcp(&query).await else {
            continue;
        };
        let Ok(response_len) = u16::try_from(response.len()) else {
            error!(len = response.len(), "Response exceeds TCP message size");
            continue;
        };

        let mut framed = Vec::with_capacity(response.len() + 2);
        framed.extend_from_slice(&response_len.to_be_bytes());
        framed.extend_from_slice(&response);
        stream.write_all(&framed).await?;
    }
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
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
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
