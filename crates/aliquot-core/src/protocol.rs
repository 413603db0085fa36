//! Protocol materialization: merge `setup` and `buffers` into ordered
//! per-buffer transfer lists, validating the request set up front.
//!
//! All configuration errors surface here, before anything touches a
//! backend. A run either starts from a fully valid request set or not at
//! all.

use std::collections::HashMap;

use crate::error::{ProtocolError, ProtocolResult};
use crate::instrument::InstrumentSettings;
use crate::types::{Buffer, ProtocolRequest, TransferRequest};

impl ProtocolRequest {
    /// Build the ordered buffer list this request set describes.
    ///
    /// Buffer order follows `setup` order and is carried explicitly; the
    /// name → buffer lookup is an index into that list, never an iteration
    /// source. Rejects unknown and duplicate buffer names, non-positive or
    /// non-finite volumes, volumes beyond the owning instrument's rated
    /// maximum, and buffers that end up with zero requests.
    pub fn materialize(&self, settings: &InstrumentSettings) -> ProtocolResult<Vec<Buffer>> {
        let mut buffers: Vec<Buffer> = Vec::with_capacity(self.setup.len());
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(self.setup.len());

        for entry in &self.setup {
            if index.contains_key(entry.name.as_str()) {
                return Err(ProtocolError::DuplicateBuffer {
                    name: entry.name.clone(),
                });
            }
            index.insert(entry.name.as_str(), buffers.len());
            buffers.push(Buffer {
                name: entry.name.clone(),
                source: entry.address.clone(),
                requests: Vec::new(),
            });
        }

        for tube in &self.buffers {
            for bv in &tube.buffer_volumes {
                let slot = *index.get(bv.name.as_str()).ok_or_else(|| {
                    ProtocolError::UnknownBuffer {
                        name: bv.name.clone(),
                    }
                })?;

                if !bv.volume.is_finite() || bv.volume <= 0.0 {
                    return Err(ProtocolError::NonPositiveVolume {
                        name: bv.name.clone(),
                        destination: tube.address.clone(),
                        volume: bv.volume,
                    });
                }

                let spec = settings.spec(settings.classify(bv.volume));
                if bv.volume > spec.max_volume {
                    return Err(ProtocolError::VolumeExceedsMaximum {
                        name: bv.name.clone(),
                        destination: tube.address.clone(),
                        volume: bv.volume,
                        instrument: spec.kind.clone(),
                        max_volume: spec.max_volume,
                    });
                }

                buffers[slot].requests.push(TransferRequest {
                    volume: bv.volume,
                    destination: tube.address.clone(),
                });
            }
        }

        if let Some(empty) = buffers.iter().find(|b| b.requests.is_empty()) {
            return Err(ProtocolError::EmptyBuffer {
                name: empty.name.clone(),
            });
        }

        Ok(buffers)
    }
}
