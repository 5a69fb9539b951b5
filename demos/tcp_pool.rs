//! Bounded TCP pool walkthrough.
//!
//! Starts a throwaway echo server, warms a pool against it, and runs a
//! connection through acquire, use, release, and shutdown.

use netpool::dial::TcpDialer;
use netpool::pool::Pool;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Throwaway echo server
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 256];
                while let Ok(n) = socket.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                    if socket.write_all(&buf[..n]).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    // 2. Pool warmed with 2 connections, capped at 8
    let pool = Pool::new(2, 8, TcpDialer::new(addr.to_string())).await?;
    println!(
        "pool ready: {} idle / {} max",
        pool.idle_count(),
        pool.max_capacity()
    );

    // 3. Acquire, use, release
    let mut conn = pool.get().await?;
    println!("acquired: {} idle remain", pool.idle_count());

    conn.write_all(b"ping").await?;
    let mut reply = [0u8; 4];
    conn.read_exact(&mut reply).await?;
    println!("echo reply: {}", String::from_utf8_lossy(&reply));

    pool.put(conn);
    println!("released: {} idle", pool.idle_count());

    // 4. Shutdown closes every idle connection and disables acquisition
    pool.close();
    println!("closed: {} idle, get now fails: {}", pool.idle_count(), pool.get().await.is_err());

    Ok(())
}
