// Copyright 2025 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned slot buffer for the flattened tree.
//!
//! The buffer is requested straight from the OS as an anonymous mapping so it
//! can be backed by huge pages. This is the only place that knows how the
//! memory was obtained; everything else sees a `[i32]`.

use std::io;

use memmap2::{MmapMut, MmapOptions};

use crate::config::Backing;
use crate::error::{FastError, Result};

#[cfg(target_os = "linux")]
const HUGE_PAGE_BYTES: usize = 2 << 20;

enum Storage {
    Mapped(MmapMut),
    Heap(Vec<i32>),
}

/// Zero-initialized `i32` slots released as a unit on drop.
pub(crate) struct SlotBuffer {
    storage: Storage,
    len: usize,
    backing: Backing,
}

impl SlotBuffer {
    /// Reserve `len` zeroed slots with the requested backing.
    pub(crate) fn allocate(len: usize, backing: Backing) -> Result<Self> {
        let bytes = len * size_of::<i32>();
        let storage = match backing {
            Backing::TransparentHugePages => Storage::Mapped(map_transparent(bytes)?),
            Backing::HugeTlb => Storage::Mapped(map_hugetlb(bytes)?),
            Backing::Heap => {
                let mut v = Vec::new();
                v.try_reserve_exact(len)
                    .map_err(|e| FastError::OutOfMemory {
                        bytes,
                        source: io::Error::new(io::ErrorKind::OutOfMemory, e),
                    })?;
                v.resize(len, 0);
                Storage::Heap(v)
            }
        };
        log::debug!("reserved {bytes} bytes for {len} slots ({backing:?})");
        Ok(Self {
            storage,
            len,
            backing,
        })
    }

    pub(crate) fn as_slice(&self) -> &[i32] {
        match &self.storage {
            // Mappings are page aligned, so the cast cannot fail.
            Storage::Mapped(m) => &bytemuck::cast_slice::<u8, i32>(&m[..])[..self.len],
            Storage::Heap(v) => v,
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [i32] {
        match &mut self.storage {
            Storage::Mapped(m) => &mut bytemuck::cast_slice_mut::<u8, i32>(&mut m[..])[..self.len],
            Storage::Heap(v) => v,
        }
    }

    /// Bytes actually reserved, including any rounding to the huge-page size.
    pub(crate) fn bytes(&self) -> usize {
        match &self.storage {
            Storage::Mapped(m) => m.len(),
            Storage::Heap(v) => v.capacity() * size_of::<i32>(),
        }
    }

    pub(crate) fn backing(&self) -> Backing {
        self.backing
    }
}

impl core::fmt::Debug for SlotBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlotBuffer")
            .field("len", &self.len)
            .field("bytes", &self.bytes())
            .field("backing", &self.backing)
            .finish_non_exhaustive()
    }
}

fn out_of_memory(bytes: usize) -> impl FnOnce(io::Error) -> FastError {
    move |source| FastError::OutOfMemory { bytes, source }
}

fn map_transparent(bytes: usize) -> Result<MmapMut> {
    let map = MmapOptions::new()
        .len(bytes)
        .map_anon()
        .map_err(out_of_memory(bytes))?;
    #[cfg(target_os = "linux")]
    if let Err(e) = map.advise(memmap2::Advice::HugePage) {
        // The mapping is still usable; it just stays on base pages.
        log::warn!("transparent huge pages unavailable for {bytes} bytes: {e}");
    }
    Ok(map)
}

#[cfg(target_os = "linux")]
fn map_hugetlb(bytes: usize) -> Result<MmapMut> {
    let rounded = bytes.div_ceil(HUGE_PAGE_BYTES) * HUGE_PAGE_BYTES;
    MmapOptions::new()
        .len(rounded)
        .huge(None)
        .map_anon()
        .map_err(out_of_memory(rounded))
}

#[cfg(not(target_os = "linux"))]
fn map_hugetlb(bytes: usize) -> Result<MmapMut> {
    Err(FastError::OutOfMemory {
        bytes,
        source: io::Error::new(
            io::ErrorKind::Unsupported,
            "explicit huge pages require Linux",
        ),
    })
}
