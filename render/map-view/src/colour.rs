use math::splitmix64;

pub const GREEN: [u8; 4] = [0, 255, 0, 255];
pub const RED: [u8; 4] = [255, 0, 0, 255];
pub const BLUE: [u8; 4] = [0, 0, 255, 255];
pub const GREY: [u8; 4] = [70, 70, 70, 255];
pub const ORANGE: [u8; 4] = [255, 165, 0, 255];
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// A colour picked from the id alone, each channel in `100..=255`. The same
/// id gives the same colour every call.
pub fn id_colour(id: u32) -> [u8; 4] {
    let hash = splitmix64(id as u64);
    let channel = |n: u32| (100 + ((hash >> (16 * n)) & 0xffff) % 156) as u8;
    [channel(0), channel(1), channel(2), 255]
}

#[cfg(test)]
mod tests {
    use super::id_colour;

    #[test]
    fn colour_is_repeatable() {
        for id in [0, 1, 7, 0x7fff, u32::MAX] {
            assert_eq!(id_colour(id), id_colour(id));
        }
    }

    #[test]
    fn colour_channels_in_range() {
        for id in 0..2000 {
            let [r, g, b, a] = id_colour(id);
            assert!(r >= 100 && g >= 100 && b >= 100, "id {id} gave {r},{g},{b}");
            assert_eq!(a, 255);
        }
    }

    #[test]
    fn neighbours_differ() {
        assert_ne!(id_colour(1), id_colour(2));
    }
}
