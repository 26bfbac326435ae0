//! Simple client that sends messages to a bytewire server and prints
//! whatever comes back.
//!
//! Run the server first:
//! - cargo run -p bytewire --example server -- 127.0.0.1 7777
//!
//! Then:
//! - cargo run -p bytewire --example client -- 127.0.0.1 7777
//! - cargo run -p bytewire --example client -- 127.0.0.1 7777 10 200
//!   (sends 10 messages, 200ms apart)

use std::{
    env, thread,
    time::{Duration, Instant},
};

use bytewire::{Config, DefaultBackend, Events, Socket, SocketMode};

struct PrintReplies;

impl Events<DefaultBackend> for PrintReplies {
    fn allocate(&mut self) -> Socket<DefaultBackend> {
        Socket::new(Config::default())
    }

    fn on_accept(&mut self, _l: &mut Socket<DefaultBackend>, _peer: Socket<DefaultBackend>) {}

    fn on_connect(&mut self, socket: &mut Socket<DefaultBackend>) {
        println!("[connect] {}:{}", socket.addr, socket.port);
    }

    fn on_recv(&mut self, _socket: &mut Socket<DefaultBackend>, bytes: &[u8]) {
        println!("[reply] \"{}\"", String::from_utf8_lossy(bytes));
    }

    fn on_send(&mut self, _socket: &mut Socket<DefaultBackend>, bytes: &[u8]) {
        println!("[sent] {} bytes", bytes.len());
    }
}

fn main() {
    // Args: <addr> <port> [count] [interval_ms]
    let mut args = env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1".into());
    let port = args.next().unwrap_or_else(|| "9000".into());
    let count: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(5);
    let interval_ms: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(300);

    let mut app = PrintReplies;
    let mut client = Socket::<DefaultBackend>::new(Config::default());
    client.init(&mut (), &addr, &port, SocketMode::Client);
    client.connect(&mut app);
    if client.is_closed() {
        eprintln!("could not connect to {addr}:{port}");
        return;
    }

    for i in 0..count {
        if client.is_closed() {
            println!("server hung up");
            break;
        }
        let msg = format!("hello {i}");
        client.write(msg.as_bytes(), &mut app);

        // poll for replies until the next send is due
        let wait_until = Instant::now() + Duration::from_millis(interval_ms);
        while Instant::now() < wait_until {
            if client.read(512, &mut app).is_fatal() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    client.shutdown();
    client.close();
    println!("done");
}
