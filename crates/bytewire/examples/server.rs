//! Simple echo server using bytewire.
//!
//! Run:
//! - cargo run -p bytewire --example server
//! - cargo run -p bytewire --example server -- 127.0.0.1 7777

use std::{env, thread, time::Duration};

use bytewire::{Config, DefaultBackend, Events, Socket, SocketMode};

/// Echo policy: stage every received byte into the socket's outbound
/// buffer; the main loop flushes it and `on_send` consumes what the OS
/// actually took.
struct EchoServer {
    accepted: Vec<Socket<DefaultBackend>>,
}

impl Events<DefaultBackend> for EchoServer {
    fn allocate(&mut self) -> Socket<DefaultBackend> {
        Socket::new(Config::default())
    }

    fn on_accept(&mut self, _listener: &mut Socket<DefaultBackend>, peer: Socket<DefaultBackend>) {
        println!("[connect] {}:{}", peer.addr, peer.port);
        self.accepted.push(peer);
    }

    fn on_connect(&mut self, _socket: &mut Socket<DefaultBackend>) {}

    fn on_recv(&mut self, socket: &mut Socket<DefaultBackend>, bytes: &[u8]) {
        println!(
            "[recv] from={}:{} payload=\"{}\"",
            socket.addr,
            socket.port,
            String::from_utf8_lossy(bytes)
        );
        if !socket.write_buf.write(bytes) {
            eprintln!("echo backlog full; dropping {} bytes", bytes.len());
        }
    }

    fn on_send(&mut self, socket: &mut Socket<DefaultBackend>, bytes: &[u8]) {
        // consume exactly what the OS accepted; the rest stays staged
        socket.write_buf.seek(bytes.len());
        socket.write_buf.defrag();
    }
}

fn main() {
    let mut args = env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1".into());
    let port = args.next().unwrap_or_else(|| "9000".into());

    let mut app = EchoServer { accepted: Vec::new() };
    let mut listener = Socket::<DefaultBackend>::new(Config::default());
    listener.init(&mut (), &addr, &port, SocketMode::Server);
    listener.listen();
    if listener.is_closed() {
        eprintln!("could not listen on {addr}:{port}");
        return;
    }
    println!("bytewire echo server listening on {addr}:{port}");

    let mut peers: Vec<Socket<DefaultBackend>> = Vec::new();
    loop {
        listener.accept(&mut app);
        peers.append(&mut app.accepted);

        for peer in &mut peers {
            // drain inbound; Idle means nothing this poll, Fatal closed it
            while peer.read(512, &mut app).is_ready() {}

            if !peer.write_buf.is_empty() {
                let staged = peer.write_buf.peek().to_vec();
                peer.write(&staged, &mut app);
            }
        }
        peers.retain(|peer| !peer.is_closed());

        thread::sleep(Duration::from_millis(10));
    }
}
