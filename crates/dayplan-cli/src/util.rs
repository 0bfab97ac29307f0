use uuid::Uuid;

/// Length of the IDs printed in tables; any unique prefix of two or more
/// characters is accepted back.
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &Uuid) -> String {
    id.to_string()[..SHORT_ID_LEN].to_string()
}

pub fn format_duration(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h{:02}m", h, m),
    }
}
