use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use esp_println::println;
use log::warn;
use smartcup_color::{PayloadString, SamplePayload};

const QUEUE_DEPTH: usize = 4;

static SAMPLE_CHANNEL: Channel<CriticalSectionRawMutex, PayloadString, QUEUE_DEPTH> =
    Channel::new();

/// Sample observer for callback mode
///
/// Serializes the sample and queues it for the notifier. Samples are dropped
/// while the queue is full.
pub(crate) fn publish_sample(r: f32, g: f32, b: f32, c: f32) {
    match SamplePayload::from_observed(r, g, b, c).to_json() {
        Ok(json) => {
            if SAMPLE_CHANNEL.try_send(json).is_err() {
                warn!("notifier: queue full, sample dropped");
            }
        }
        Err(err) => warn!("notifier: failed to serialize sample: {:?}", err),
    }
}

/// Publishes queued samples as JSON lines on the serial console
#[embassy_executor::task]
pub(crate) async fn sample_notifier_task() {
    let receiver = SAMPLE_CHANNEL.receiver();
    loop {
        let payload = receiver.receive().await;
        println!("{}", payload);
    }
}
