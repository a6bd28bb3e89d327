//! Headless GPU side of the light-volume classifier.
//!
//! No surface and no window: just a device, used to run the classifier WGSL
//! as a compute pass and compare it with the CPU reference.

mod classifier;

pub use classifier::GpuClassifier;

use crate::error::GpuError;

/// Adapter requests in the order they are tried: hardware first, then a
/// software fallback (e.g. lavapipe or WARP) for headless machines.
fn adapter_attempts() -> [wgpu::RequestAdapterOptions<'static, 'static>; 2] {
    [false, true].map(|force_fallback_adapter| wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter,
    })
}

/// Pick an adapter, falling back to a software one, and open a device on it.
pub(crate) async fn request_device() -> Result<(wgpu::Device, wgpu::Queue), GpuError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..Default::default()
    });

    let mut adapter = None;
    for options in adapter_attempts() {
        adapter = instance.request_adapter(&options).await;
        if adapter.is_some() {
            break;
        }
        log::debug!("no adapter with force_fallback_adapter = {}", options.force_fallback_adapter);
    }
    let adapter = adapter.ok_or(GpuError::NoAdapter)?;

    let info = adapter.get_info();
    log::info!("using adapter {} ({:?})", info.name, info.backend);

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Classifier Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await?;

    Ok((device, queue))
}
