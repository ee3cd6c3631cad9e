//! Test doubles for the JDS6600 driver.

#![allow(dead_code)]

use async_trait::async_trait;
use fgen_core::{FgenError, FgenResult, LineTransport, SerialTransport};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

/// Transport that records requests and answers from a fixed script.
#[derive(Default)]
pub struct ScriptedTransport {
    pub sent: Vec<String>,
    replies: VecDeque<String>,
    stale: usize,
    pub drains: usize,
}

impl ScriptedTransport {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Pretend `bytes` of an earlier reply are still queued.
    pub fn with_stale(mut self, bytes: usize) -> Self {
        self.stale = bytes;
        self
    }

    pub fn remaining_replies(&self) -> usize {
        self.replies.len()
    }
}

#[async_trait]
impl LineTransport for ScriptedTransport {
    async fn write_line(&mut self, line: &str) -> FgenResult<()> {
        self.sent.push(line.to_string());
        Ok(())
    }

    async fn read_line(&mut self) -> FgenResult<String> {
        self.replies
            .pop_front()
            .ok_or(FgenError::TransportTimeout {
                timeout: Duration::from_millis(0),
            })
    }

    fn bytes_available(&self) -> usize {
        self.stale
    }

    async fn drain_stale_input(&mut self) -> FgenResult<usize> {
        self.drains += 1;
        Ok(std::mem::take(&mut self.stale))
    }
}

/// In-memory instrument answering over a duplex stream.
///
/// Keeps a register file, answers `:r` with the stored values and `:w` with
/// `:ok`. Every request line is recorded.
pub struct FakeInstrument {
    pub requests: Arc<Mutex<Vec<String>>>,
    pub registers: Arc<Mutex<HashMap<u8, Vec<i64>>>>,
}

impl FakeInstrument {
    /// Spawn the instrument and return a transport connected to it.
    pub fn spawn(
        registers: HashMap<u8, Vec<i64>>,
    ) -> (Self, SerialTransport<DuplexStream>) {
        let (host, device) = tokio::io::duplex(1024);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let registers = Arc::new(Mutex::new(registers));

        let task_requests = requests.clone();
        let task_registers = registers.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(device).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let line = line.trim().to_string();
                task_requests.lock().unwrap().push(line.clone());
                let reply = answer(&line, &mut task_registers.lock().unwrap());
                let device = lines.get_mut().get_mut();
                if device
                    .write_all(format!("{reply}\r\n").as_bytes())
                    .await
                    .is_err()
                {
                    break;
                }
            }
        });

        let transport =
            SerialTransport::new(host, Duration::from_millis(200), Duration::from_millis(5));
        (
            Self {
                requests,
                registers,
            },
            transport,
        )
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn register(&self, address: u8) -> Option<Vec<i64>> {
        self.registers.lock().unwrap().get(&address).cloned()
    }
}

fn answer(line: &str, registers: &mut HashMap<u8, Vec<i64>>) -> String {
    let Some(body) = line.strip_suffix('.') else {
        return ":err".into();
    };
    let Some((head, args)) = body.split_once('=') else {
        return ":err".into();
    };
    let Ok(address) = head[2..].parse::<u8>() else {
        return ":err".into();
    };
    let values: Vec<i64> = args.split(',').filter_map(|v| v.parse().ok()).collect();

    if head.starts_with(":w") {
        registers.insert(address, values);
        ":ok".into()
    } else {
        let stored = registers.get(&address).cloned().unwrap_or_else(|| vec![0]);
        let joined: Vec<String> = stored.iter().map(i64::to_string).collect();
        format!(":r{:02}={}.", address, joined.join(","))
    }
}
