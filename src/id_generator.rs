use uuid::Uuid;

/// Fresh opaque id for a canvas placement. Never reused within a session.
pub fn generate_instance_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fresh opaque id for a source photo.
pub fn generate_photo_id() -> String {
    Uuid::new_v4().to_string()
}
