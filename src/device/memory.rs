//! In-process terminal: serves fixed users/punches, records what the session
//! did to it and can be told to fail any operation.

use super::capability::{CapabilityError, CapabilityResult, DeviceDriver, DeviceLink};
use crate::models::{RawAttendancePunch, RawUser};
use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Connect,
    Disconnect,
    Enable,
    Disable,
    IsEnabled,
    ListUsers,
    ListAttendance,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<RawUser>,
    attendance: Vec<RawAttendancePunch>,
    enabled: Option<bool>,
    connected: bool,
    connects: usize,
    last_password: Option<String>,
    failing: HashSet<Op>,
}

/// Cloning shares the same terminal.
#[derive(Clone, Default)]
pub struct MemoryDevice {
    state: Arc<Mutex<MemoryState>>,
    attendance_gate: Arc<Mutex<Option<Receiver<()>>>>,
}

impl MemoryDevice {
    pub fn new(users: Vec<RawUser>, attendance: Vec<RawAttendancePunch>) -> Self {
        let device = Self::default();
        {
            let mut st = device.lock();
            st.users = users;
            st.attendance = attendance;
            st.enabled = Some(true);
        }
        device
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // a poisoned fake is still usable: the state is plain data
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn fail(&self, op: Op) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.lock().failing.remove(&op);
    }

    /// Make the terminal stop reporting its enabled flag.
    pub fn hide_enabled_flag(&self) {
        self.lock().enabled = None;
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    pub fn enabled_flag(&self) -> Option<bool> {
        self.lock().enabled
    }

    pub fn connect_count(&self) -> usize {
        self.lock().connects
    }

    pub fn last_password(&self) -> Option<String> {
        self.lock().last_password.clone()
    }

    /// The next attendance pull blocks until the returned sender fires (or is dropped).
    pub fn hold_attendance(&self) -> Sender<()> {
        let (tx, rx) = mpsc::channel();
        *self
            .attendance_gate
            .lock()
            .unwrap_or_else(|p| p.into_inner()) = Some(rx);
        tx
    }

    fn check(&self, op: Op) -> CapabilityResult<()> {
        if self.lock().failing.contains(&op) {
            return Err(CapabilityError::new(format!("{op:?} failed (injected)")));
        }
        Ok(())
    }
}

impl DeviceDriver for MemoryDevice {
    fn connect(
        &self,
        ip: &str,
        port: u16,
        _timeout: u32,
        password: &str,
    ) -> CapabilityResult<Box<dyn DeviceLink>> {
        self.check(Op::Connect)
            .map_err(|_| CapabilityError::new(format!("no route to {ip}:{port}")))?;

        let mut st = self.lock();
        st.connected = true;
        st.connects += 1;
        st.last_password = Some(password.to_string());
        drop(st);

        Ok(Box::new(MemoryLink {
            device: self.clone(),
        }))
    }
}

struct MemoryLink {
    device: MemoryDevice,
}

impl DeviceLink for MemoryLink {
    fn disconnect(&mut self) -> CapabilityResult<()> {
        self.device.check(Op::Disconnect)?;
        self.device.lock().connected = false;
        Ok(())
    }

    fn enable(&mut self) -> CapabilityResult<()> {
        self.device.check(Op::Enable)?;
        self.device.lock().enabled = Some(true);
        Ok(())
    }

    fn disable(&mut self) -> CapabilityResult<()> {
        self.device.check(Op::Disable)?;
        self.device.lock().enabled = Some(false);
        Ok(())
    }

    fn is_enabled(&mut self) -> CapabilityResult<Option<bool>> {
        self.device.check(Op::IsEnabled)?;
        Ok(self.device.lock().enabled)
    }

    fn list_users(&mut self) -> CapabilityResult<Vec<RawUser>> {
        self.device.check(Op::ListUsers)?;
        Ok(self.device.lock().users.clone())
    }

    fn list_attendance(&mut self) -> CapabilityResult<Vec<RawAttendancePunch>> {
        let gate = self
            .device
            .attendance_gate
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        if let Some(rx) = gate {
            let _ = rx.recv();
        }

        self.device.check(Op::ListAttendance)?;
        Ok(self.device.lock().attendance.clone())
    }
}
