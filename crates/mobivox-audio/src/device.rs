use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};
use mobivox_core::AudioError;

pub struct DeviceManager {
    host: Host,
}

impl DeviceManager {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    pub fn list_output_devices(&self) -> Result<Vec<(String, Device)>, AudioError> {
        let devices = self
            .host
            .output_devices()
            .map_err(|e| AudioError::DeviceEnumeration(e.to_string()))?;

        Ok(devices
            .map(|device| {
                let name = device.name().unwrap_or_else(|_| "unknown".to_string());
                (name, device)
            })
            .collect())
    }

    pub fn get_output_device(&self, name: &str) -> Result<Device, AudioError> {
        if name == "default" {
            return self
                .host
                .default_output_device()
                .ok_or_else(|| AudioError::DeviceNotFound("no default output device".to_string()));
        }

        self.list_output_devices()?
            .into_iter()
            .find(|(dev_name, _)| dev_name == name)
            .map(|(_, device)| device)
            .ok_or_else(|| AudioError::DeviceNotFound(format!("output device not found: {}", name)))
    }
}

impl Default for DeviceManager {
    fn default() -> Self {
        Self::new()
    }
}
