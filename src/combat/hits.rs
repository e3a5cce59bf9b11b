//! Attack-versus-defense hit arithmetic

use rand::Rng;

use crate::core::config::CombatScale;

/// Largest level difference that still changes the power-of-two odds
const MAX_DOUBLINGS: i32 = 40;

/// Odds of a hit as (to_hit, to_miss)
pub fn hit_odds(attack: i32, defense: i32, scale: CombatScale) -> (u64, u64) {
    match scale {
        CombatScale::PowerOfTwo => {
            if attack > defense {
                let diff = (attack - defense).min(MAX_DOUBLINGS);
                (1u64 << diff, 1)
            } else if defense > attack {
                let diff = (defense - attack).min(MAX_DOUBLINGS);
                (1, 1u64 << diff)
            } else {
                (1, 1)
            }
        }
        CombatScale::Linear => {
            let mut to_hit = attack as i64;
            let mut to_miss = defense as i64;
            // both sides get at least one chance
            if to_hit < 1 {
                to_miss += to_hit.abs() + 1;
                to_hit = 1;
            }
            if to_miss < 1 {
                to_hit += to_miss.abs() + 1;
                to_miss = 1;
            }
            (to_hit as u64, to_miss as u64)
        }
    }
}

/// Roll one attack at `attack` against `defense`
pub fn attack_hits<R: Rng + ?Sized>(
    attack: i32,
    defense: i32,
    scale: CombatScale,
    rng: &mut R,
) -> bool {
    let (to_hit, to_miss) = hit_odds(attack, defense, scale);
    rng.gen_range(0..to_hit + to_miss) < to_hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_power_of_two_odds() {
        assert_eq!(hit_odds(3, 3, CombatScale::PowerOfTwo), (1, 1));
        assert_eq!(hit_odds(4, 1, CombatScale::PowerOfTwo), (8, 1));
        assert_eq!(hit_odds(0, 2, CombatScale::PowerOfTwo), (1, 4));
        // Huge gaps saturate instead of overflowing
        assert_eq!(hit_odds(1000, 0, CombatScale::PowerOfTwo), (1u64 << 40, 1));
    }

    #[test]
    fn test_linear_odds() {
        assert_eq!(hit_odds(3, 2, CombatScale::Linear), (3, 2));
        assert_eq!(hit_odds(0, 2, CombatScale::Linear), (1, 3));
        assert_eq!(hit_odds(-2, 2, CombatScale::Linear), (1, 5));
        assert_eq!(hit_odds(2, 0, CombatScale::Linear), (3, 1));
    }

    #[test]
    fn test_even_odds_hit_about_half() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let hits = (0..10_000)
            .filter(|_| attack_hits(2, 2, CombatScale::PowerOfTwo, &mut rng))
            .count();
        assert!((4_700..=5_300).contains(&hits), "hits = {}", hits);
    }
}
