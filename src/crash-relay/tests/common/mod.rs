use anyhow::Result;
use crash_relay::config::SinkOptions;
use crash_relay::sink::{CustomData, DataProvider, ReportSink};
use crash_relay::ReportPayload;
use std::sync::Mutex;

/// Sink that keeps everything it is given.
#[derive(Default)]
pub struct RecordingSink {
    pub inits: Mutex<Vec<(String, SinkOptions)>>,
    pub provider: Mutex<Option<DataProvider>>,
    pub attached: Mutex<bool>,
    pub sent: Mutex<Vec<ReportPayload>>,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<ReportPayload> {
        self.sent.lock().unwrap().clone()
    }

    pub fn custom_data(&self) -> Option<CustomData> {
        self.provider.lock().unwrap().as_ref().map(|provider| provider())
    }

    pub fn is_attached(&self) -> bool {
        *self.attached.lock().unwrap()
    }
}

impl ReportSink for RecordingSink {
    fn init(&self, api_key: &str, options: &SinkOptions) -> Result<()> {
        self.inits
            .lock()
            .unwrap()
            .push((api_key.to_string(), options.clone()));
        Ok(())
    }

    fn with_custom_data(&self, provider: DataProvider) {
        *self.provider.lock().unwrap() = Some(provider);
    }

    fn attach(&self) -> Result<()> {
        *self.attached.lock().unwrap() = true;
        Ok(())
    }

    fn detach(&self) {
        *self.attached.lock().unwrap() = false;
    }

    fn send(&self, payload: ReportPayload) {
        self.sent.lock().unwrap().push(payload);
    }
}
