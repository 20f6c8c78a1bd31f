//! Redis error mapping to CacheError.

use academia_core::cache::CacheError;

/// Maps Redis errors to CacheError.
///
/// A reply that cannot be converted to the requested type becomes
/// `Serialization`.
pub fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        CacheError::ConnectionFailed(err.to_string())
    } else if err.kind() == redis::ErrorKind::TypeError {
        CacheError::Serialization(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}
