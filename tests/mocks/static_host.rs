use document_search::host::ActiveContent;
use document_search::target::SearchTarget;
use std::sync::Mutex;

/// Mock host whose active content is set directly by the test.
#[allow(dead_code)]
#[derive(Default)]
pub struct StaticHost {
    active: Mutex<Option<SearchTarget>>,
}

#[allow(dead_code)]
impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active(target: SearchTarget) -> Self {
        Self {
            active: Mutex::new(Some(target)),
        }
    }

    pub fn set_active(&self, target: Option<SearchTarget>) {
        *self.active.lock().unwrap() = target;
    }
}

impl ActiveContent for StaticHost {
    fn active_target(&self) -> Option<SearchTarget> {
        self.active.lock().unwrap().clone()
    }
}
