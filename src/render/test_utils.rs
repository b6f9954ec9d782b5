// git-tasks: Multi-Repository Git Runner
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Instrumented output sink and a tiny terminal emulator for tests.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::ThreadId;
use std::time::Duration;

#[derive(Debug, Default)]
struct ProbeState {
    bytes: Vec<u8>,
    /// Thread inside an unflushed write span.
    span_owner: Option<ThreadId>,
    overlaps: usize,
    spans: usize,
}

/// `Write` sink recording every byte and flagging write spans (first write
/// up to flush) that interleave across threads.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProbeWriter {
    state: Arc<Mutex<ProbeState>>,
}

impl ProbeWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn boxed(&self) -> Box<dyn Write + Send> {
        Box::new(self.clone())
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ProbeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.state().bytes).into_owned()
    }

    pub(crate) fn overlaps(&self) -> usize {
        self.state().overlaps
    }

    pub(crate) fn spans(&self) -> usize {
        self.state().spans
    }

    /// Screen lines reconstructed from the recorded bytes.
    pub(crate) fn screen(&self) -> Vec<String> {
        render_screen(&self.text())
    }
}

impl Write for ProbeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let me = std::thread::current().id();
        {
            let mut state = self.state();
            match state.span_owner {
                Some(owner) if owner != me => state.overlaps += 1,
                Some(_) => {}
                None => state.spans += 1,
            }
            state.span_owner = Some(me);
            state.bytes.extend_from_slice(buf);
        }
        // widen the window an unserialized writer would hit
        std::thread::sleep(Duration::from_micros(20));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.state().span_owner = None;
        Ok(())
    }
}

/// Replays text, `\n`, `\r` and CSI sequences (`H` moves, `K` erases to the
/// end of the line, the rest ignored)
/// onto a grid and returns its rows with trailing blanks trimmed.
pub(crate) fn render_screen(text: &str) -> Vec<String> {
    let mut grid: BTreeMap<usize, Vec<char>> = BTreeMap::new();
    let (mut row, mut col) = (0usize, 0usize);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' if chars.peek() == Some(&'[') => {
                chars.next();
                let mut params = String::new();
                let mut last = None;
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        last = Some(c);
                        break;
                    }
                    params.push(c);
                }
                match last {
                    Some('H') => {
                        let mut parts =
                            params.split(';').map(|p| p.parse::<usize>().unwrap_or(1));
                        row = parts.next().unwrap_or(1).saturating_sub(1);
                        col = parts.next().unwrap_or(1).saturating_sub(1);
                    }
                    Some('K') => {
                        if let Some(line) = grid.get_mut(&row) {
                            line.truncate(col);
                        }
                    }
                    _ => {}
                }
            }
            '\n' => {
                row += 1;
                col = 0;
            }
            '\r' => col = 0,
            c => {
                let line = grid.entry(row).or_default();
                if line.len() <= col {
                    line.resize(col + 1, ' ');
                }
                line[col] = c;
                col += 1;
            }
        }
    }

    let height = grid.keys().next_back().map_or(0, |last| last + 1);
    (0..height)
        .map(|r| {
            grid.get(&r)
                .map(|line| line.iter().collect::<String>().trim_end().to_string())
                .unwrap_or_default()
        })
        .collect()
}
