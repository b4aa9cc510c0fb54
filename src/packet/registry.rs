//! TypeId dispatch table
//!
//! Maps an incoming packet's TypeId to the decode routine of the composite
//! registered for it, producing one common message type `T`.

use std::collections::HashMap;
use std::fmt;

use crate::error::{PacketError, Result};
use crate::type_id::TypeId;

use super::{Composite, Unpacker};

type DecodeFn<T> = Box<dyn Fn(&Unpacker<'_>) -> Result<T> + Send + Sync>;

struct Entry<T> {
    name: &'static str,
    decode: DecodeFn<T>,
}

/// Decoders keyed by TypeId
pub struct Registry<T> {
    entries: HashMap<TypeId, Entry<T>>,
}

impl<T: 'static> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register composite `C`, wrapping each decoded value with `wrap`.
    ///
    /// A second registration for the same TypeId replaces the first.
    pub fn register<C>(&mut self, wrap: fn(C) -> T) -> &mut Self
    where
        C: Composite + 'static,
    {
        let name = std::any::type_name::<C>();
        let entry = Entry {
            name,
            decode: Box::new(decoder(wrap)),
        };
        if let Some(old) = self.entries.insert(C::TYPE_ID, entry) {
            tracing::warn!(type_id = %C::TYPE_ID, replaced = old.name, by = name, "duplicate packet registration");
        }
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<C>(mut self, wrap: fn(C) -> T) -> Self
    where
        C: Composite + 'static,
    {
        self.register(wrap);
        self
    }

    /// Decode the packet under `unpacker` with the decoder for its TypeId
    pub fn decode(&self, unpacker: &Unpacker<'_>) -> Result<T> {
        let type_id = unpacker.type_id();
        let entry = self
            .entries
            .get(&type_id)
            .ok_or(PacketError::UnknownPacketType(type_id))?;
        tracing::trace!(%type_id, packet = entry.name, "dispatching packet");
        (entry.decode)(unpacker)
    }

    /// Decode a frame holding one packet at offset 0
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<T> {
        let unpacker = Unpacker::new(bytes, 0)?;
        self.decode(&unpacker)
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.entries.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decoder<C, T>(wrap: fn(C) -> T) -> impl Fn(&Unpacker<'_>) -> Result<T> + Send + Sync
where
    C: Composite,
{
    move |unpacker| C::decode_args(unpacker).map(wrap)
}

impl<T: 'static> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(id, e)| (id, e.name)))
            .finish()
    }
}
