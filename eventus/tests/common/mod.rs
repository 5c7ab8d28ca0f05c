#![allow(dead_code)]

use eventus::{Channel, SharedChannel};

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

/// What a [`ScriptedChannel`] does on its next transfer attempt.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Transfer at most `n` bytes.
    Transfer(usize),

    /// Transfer at most `n` bytes, then report end-of-stream.
    Last(usize),

    /// Transfer nothing.
    Nothing,

    /// Transfer nothing and report end-of-stream.
    Eof,

    /// Fail with the given error kind.
    Fail(io::ErrorKind),

    /// Claim `n` bytes regardless of the region size.
    Overreport(usize),

    /// Panic inside the channel.
    Panic,
}

#[derive(Default)]
struct Script {
    steps: VecDeque<Step>,
    source: VecDeque<u8>,
    written: Vec<u8>,
    requested: Vec<usize>,
}

/// In-memory channel whose per-attempt behaviour is scripted.
///
/// Once the script is exhausted, writes accept everything and reads drain
/// the remaining source bytes, reporting end-of-stream when it is empty.
#[derive(Default)]
pub struct ScriptedChannel {
    script: Mutex<Script>,
    eof: AtomicBool,
    closed: AtomicBool,
    attempts: AtomicUsize,
}

impl ScriptedChannel {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Self::with_source(steps, [])
    }

    pub fn with_source(
        steps: impl IntoIterator<Item = Step>,
        source: impl IntoIterator<Item = u8>,
    ) -> Arc<Self> {
        let channel = Self::default();
        {
            let mut script = channel.script.lock().unwrap();
            script.steps = steps.into_iter().collect();
            script.source = source.into_iter().collect();
        }
        Arc::new(channel)
    }

    pub fn shared(self: &Arc<Self>) -> SharedChannel {
        self.clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn written(&self) -> Vec<u8> {
        self.script.lock().unwrap().written.clone()
    }

    /// Region length seen by each attempt, in order.
    pub fn requested(&self) -> Vec<usize> {
        self.script.lock().unwrap().requested.clone()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn next_step(&self, requested: usize) -> Option<Step> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let mut script = self.script.lock().unwrap();
        script.requested.push(requested);
        script.steps.pop_front()
    }
}

impl Channel for ScriptedChannel {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let step = self.next_step(buf.len());

        let n = match step {
            None => buf.len(),
            Some(Step::Transfer(n)) => n.min(buf.len()),
            Some(Step::Last(n)) => {
                self.eof.store(true, Ordering::SeqCst);
                n.min(buf.len())
            }
            Some(Step::Nothing) => 0,
            Some(Step::Eof) => {
                self.eof.store(true, Ordering::SeqCst);
                0
            }
            Some(Step::Fail(kind)) => return Err(io::Error::from(kind)),
            Some(Step::Overreport(n)) => return Ok(n),
            Some(Step::Panic) => panic!("scripted channel panic"),
        };

        self.script.lock().unwrap().written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let step = self.next_step(buf.len());

        let mut script = self.script.lock().unwrap();
        let available = script.source.len();

        let n = match step {
            None => {
                if available == 0 {
                    self.eof.store(true, Ordering::SeqCst);
                }
                buf.len().min(available)
            }
            Some(Step::Transfer(n)) => n.min(buf.len()).min(available),
            Some(Step::Last(n)) => {
                self.eof.store(true, Ordering::SeqCst);
                n.min(buf.len()).min(available)
            }
            Some(Step::Nothing) => 0,
            Some(Step::Eof) => {
                self.eof.store(true, Ordering::SeqCst);
                0
            }
            Some(Step::Fail(kind)) => return Err(io::Error::from(kind)),
            Some(Step::Overreport(n)) => return Ok(n),
            Some(Step::Panic) => {
                drop(script);
                panic!("scripted channel panic")
            }
        };

        for (slot, byte) in buf.iter_mut().zip(script.source.drain(..n)) {
            *slot = byte;
        }

        Ok(n)
    }

    fn has_reached_end(&self) -> bool {
        self.eof.load(Ordering::SeqCst)
    }

    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }
}

/// Channel whose transfers block until [`GatedChannel::open_gate`] is called.
#[derive(Default)]
pub struct GatedChannel {
    gate: Mutex<bool>,
    opened: Condvar,
    entered: AtomicUsize,
    chunk: Option<usize>,
}

impl GatedChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Gated channel transferring at most `chunk` bytes per attempt.
    pub fn with_chunk(chunk: usize) -> Arc<Self> {
        Arc::new(Self {
            chunk: Some(chunk),
            ..Self::default()
        })
    }

    pub fn open_gate(&self) {
        *self.gate.lock().unwrap() = true;
        self.opened.notify_all();
    }

    /// Number of transfers that reached the gate.
    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }

    /// Spins until at least one transfer is blocked on the gate.
    pub fn wait_entered(&self) {
        while self.entered() == 0 {
            std::thread::yield_now();
        }
    }

    fn pass(&self, len: usize) -> usize {
        self.entered.fetch_add(1, Ordering::SeqCst);

        let mut open = self.gate.lock().unwrap();
        while !*open {
            open = self.opened.wait(open).unwrap();
        }

        self.chunk.map_or(len, |chunk| len.min(chunk))
    }
}

impl Channel for GatedChannel {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.pass(buf.len()))
    }

    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.pass(buf.len()))
    }

    fn has_reached_end(&self) -> bool {
        false
    }
}
