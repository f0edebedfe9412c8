//! Scripted transports and renderers for tier tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;

use super::profile::ClientProfile;
use super::render::{PageRenderer, RenderedPage};
use super::transport::{HttpTransport, TransportFactory};
use crate::error_handling::{RenderError, TransportError};

/// One request as seen by a fake transport.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub method: Method,
    pub user_agent: String,
    pub timeout: Duration,
    pub verify_tls: bool,
}

/// Replays a fixed sequence of results, then repeats the last one.
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Result<u16, TransportError>>>,
    last: Mutex<Result<u16, TransportError>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<u16, TransportError>>) -> Arc<Self> {
        let last = script
            .last()
            .cloned()
            .unwrap_or_else(|| Err(TransportError::Client("empty script".into())));
        Arc::new(ScriptedTransport {
            script: Mutex::new(script.into()),
            last: Mutex::new(last),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn always(result: Result<u16, TransportError>) -> Arc<Self> {
        Self::new(vec![result])
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn request(
        &self,
        method: Method,
        _url: &str,
        profile: &ClientProfile,
    ) -> Result<u16, TransportError> {
        self.calls.lock().expect("calls lock").push(Call {
            method,
            user_agent: profile.user_agent().to_string(),
            timeout: profile.timeout(),
            verify_tls: profile.verify_tls(),
        });
        let next = self.script.lock().expect("script lock").pop_front();
        match next {
            Some(result) => result,
            None => self.last.lock().expect("last lock").clone(),
        }
    }
}

/// Factory handing out one shared scripted transport.
pub(crate) struct FakeFactory {
    pub transport: Arc<ScriptedTransport>,
    pub builds: AtomicUsize,
    pub fail_build: bool,
    pub last_verify_tls: Mutex<Option<bool>>,
}

impl FakeFactory {
    pub fn new(transport: Arc<ScriptedTransport>) -> Arc<Self> {
        Arc::new(FakeFactory {
            transport,
            builds: AtomicUsize::new(0),
            fail_build: false,
            last_verify_tls: Mutex::new(None),
        })
    }

    pub fn failing(transport: Arc<ScriptedTransport>) -> Arc<Self> {
        Arc::new(FakeFactory {
            transport,
            builds: AtomicUsize::new(0),
            fail_build: true,
            last_verify_tls: Mutex::new(None),
        })
    }
}

impl TransportFactory for FakeFactory {
    fn build(&self, profile: &ClientProfile) -> Result<Arc<dyn HttpTransport>, TransportError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        *self.last_verify_tls.lock().expect("tls lock") = Some(profile.verify_tls());
        if self.fail_build {
            return Err(TransportError::Client("builder failed".into()));
        }
        Ok(self.transport.clone())
    }
}

/// Renderer returning a canned page or error.
pub(crate) struct FakeRenderer {
    page: Option<RenderedPage>,
    pub calls: AtomicUsize,
}

impl FakeRenderer {
    pub fn page(content: &str, title: Option<&str>) -> Arc<Self> {
        Arc::new(FakeRenderer {
            page: Some(RenderedPage {
                content: content.to_string(),
                title: title.map(str::to_string),
            }),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(FakeRenderer {
            page: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    async fn render(
        &self,
        _url: &str,
        _user_agent: &str,
        _settle: Duration,
    ) -> Result<RenderedPage, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.page
            .clone()
            .ok_or_else(|| RenderError::Launch("no browser available".into()))
    }
}
