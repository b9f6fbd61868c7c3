pub mod device;
pub mod output;
pub mod pcm;
pub mod playback;

pub use device::DeviceManager;
pub use output::{CpalSink, StreamHandle};
pub use pcm::{decode_base64, decode_payload, pcm16_to_samples};
pub use playback::{PlaybackController, PlaybackEvent, PlaybackSink, PlaybackState};
