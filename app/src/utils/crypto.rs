use nanoid::nanoid;

/// Row ids across all tables.
pub fn generate_uuid() -> String {
    nanoid!()
}

/// Invitation tokens get extra length: they travel in emails and URLs.
pub fn generate_invite_token() -> String {
    nanoid!(32)
}
