//! Store configuration
//!
//! Defaults suit a small CRUD backend: stores of a few megabytes, documents of
//! a few kilobytes. `ScanLimits` bound the memory a single scan can pin.

/// Default read buffer capacity for streaming scans
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Default upper bound on the serialized size of one stored document
pub const DEFAULT_MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024;

/// Default maximum nesting depth inside one document
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Limits enforced by the object scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Maximum bytes buffered for a single top-level object
    pub max_document_size: usize,
    /// Maximum `{`/`[` nesting inside a single top-level object
    pub max_depth: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ScanLimits {
    /// Limits that never trigger
    pub fn unbounded() -> Self {
        Self {
            max_document_size: usize::MAX,
            max_depth: usize::MAX,
        }
    }
}

/// Configuration shared by the reader and the writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Capacity of the buffered reader used for streaming scans
    pub read_buffer_size: usize,
    /// Scanner limits
    pub limits: ScanLimits,
    /// Serialize mutations of the same path behind an async mutex
    pub serialize_writers: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            limits: ScanLimits::default(),
            serialize_writers: true,
        }
    }
}

impl StoreConfig {
    /// Create configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set read buffer capacity (clamped to at least one byte)
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// Set scanner limits
    pub fn with_limits(mut self, limits: ScanLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Enable or disable per-path writer serialization
    pub fn with_serialized_writers(mut self, enabled: bool) -> Self {
        self.serialize_writers = enabled;
        self
    }
}
