/// Input bounds enforced before anything reaches the store.
/// RFC 5321 path limit.
pub const MAX_EMAIL_LEN: usize = 254;

pub const MAX_RESOURCE_ID_LEN: usize = 64;

/// Cap on rows a single listing will hydrate; anything beyond is dropped
/// with a warning rather than hammering the resource tables.
pub const MAX_TRIPS_PER_LISTING: usize = 500;
