use crate::event::{Event, EventBus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::watch;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum MixBus {
    Master,
    Music,
    Ambience,
    Sfx,
    Sfx2d,
    Sfx3d,
}

#[derive(Clone, Debug)]
pub enum MixerAction {
    SetBusVolume { bus: MixBus, volume: f32 },
}

/// Latest volume of every mixer bus. Buses never set default to full volume.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BusVolumes {
    volumes: HashMap<MixBus, f32>,
}

impl BusVolumes {
    pub fn get(&self, bus: MixBus) -> f32 {
        self.volumes.get(&bus).copied().unwrap_or(1.0)
    }

    /// Clamps `volume` to [0, 1].
    pub fn set(&mut self, bus: MixBus, volume: f32) {
        self.volumes.insert(bus, volume.clamp(0.0, 1.0));
    }
}

pub type MixerOutput = watch::Receiver<BusVolumes>;

/// Sends a bus volume to the mixer task.
pub fn set_mix_volume(bus: &EventBus, mix_bus: MixBus, volume: f32) {
    bus.send(Event::Mixer(MixerAction::SetBusVolume {
        bus: mix_bus,
        volume,
    }));
}

/// Spawns the mixer task. Downstream consumers (the audio backend) watch
/// the returned receiver for volume changes.
pub fn init(bus: &EventBus, initial: BusVolumes) -> MixerOutput {
    let (tx, rx) = watch::channel(initial);

    let mut subscriber = bus.subscribe();
    tokio::spawn(async move {
        loop {
            let event = subscriber.recv().await;

            if let Event::Mixer(MixerAction::SetBusVolume {
                bus: mix_bus,
                volume,
            }) = event
            {
                debug!("Setting {mix_bus:?} bus volume to {volume:.2}");
                tx.send_modify(|volumes| volumes.set(mix_bus, volume));
            }
        }
    });

    rx
}
