use redis::Client;

/// Creates a Redis client for the recommendation cache
///
/// Connections are multiplexed per call site via the connection-manager
/// feature; TTL enforcement lives entirely in Redis.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}
