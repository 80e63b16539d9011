use crate::{Ball, Config, Events, GameMap, GameRng, Score, Side};
use hecs::World;

/// Check if ball left the table (scoring)
///
/// A ball fully past the left edge is a point for the right side, fully past
/// the right edge a point for the left side. At most one point per tick.
pub fn check_scoring(
    world: &mut World,
    map: &GameMap,
    score: &mut Score,
    events: &mut Events,
    rng: &mut GameRng,
    config: &Config,
) -> Option<Side> {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        let half = ball.half_size();
        let scorer = if ball.pos.x + half < 0.0 {
            Side::Right
        } else if ball.pos.x - half > map.width {
            Side::Left
        } else {
            continue;
        };

        score.increment(scorer);
        match scorer {
            Side::Left => events.left_scored = true,
            Side::Right => events.right_scored = true,
        }
        log::debug!("{:?} scored ({}-{})", scorer, score.left, score.right);

        ball.relaunch(
            map.ball_spawn(),
            config.ball_speed_x,
            config.ball_speed_y,
            config.relaunch_min_dy,
            rng,
        );
        return Some(scorer);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_ball;
    use glam::Vec2;

    fn setup_world() -> (hecs::World, Config, GameMap, Score, Events, GameRng) {
        let world = hecs::World::new();
        let config = Config::new();
        let map = GameMap::from_config(&config);
        let score = Score::new();
        let events = Events::new();
        let rng = GameRng::new(12345); // Fixed seed for deterministic tests
        (world, config, map, score, events, rng)
    }

    #[test]
    fn test_right_player_scores_when_ball_exits_left() {
        let (mut world, config, map, mut score, mut events, mut rng) = setup_world();
        create_ball(&mut world, Vec2::new(-7.0, 100.0), Vec2::new(-8.0, 0.0), config.ball_size);

        let scorer = check_scoring(&mut world, &map, &mut score, &mut events, &mut rng, &config);

        assert_eq!(scorer, Some(Side::Right));
        assert_eq!(score.right, 1, "Right player should score");
        assert_eq!(score.left, 0, "Left player should not score");
        assert!(events.right_scored && !events.left_scored);
    }

    #[test]
    fn test_left_player_scores_when_ball_exits_right() {
        let (mut world, config, map, mut score, mut events, mut rng) = setup_world();
        create_ball(
            &mut world,
            Vec2::new(map.width + 7.0, 100.0),
            Vec2::new(8.0, 0.0),
            config.ball_size,
        );

        check_scoring(&mut world, &map, &mut score, &mut events, &mut rng, &config);

        assert_eq!(score.left, 1, "Left player should score");
        assert_eq!(score.right, 0, "Right player should not score");
        assert!(events.left_scored && !events.right_scored);
    }

    #[test]
    fn test_partially_out_ball_does_not_score() {
        let (mut world, config, map, mut score, mut events, mut rng) = setup_world();
        create_ball(&mut world, Vec2::new(-2.0, 100.0), Vec2::new(-8.0, 0.0), config.ball_size);

        assert_eq!(
            check_scoring(&mut world, &map, &mut score, &mut events, &mut rng, &config),
            None
        );
        assert_eq!(score, Score::new());
    }

    #[test]
    fn test_ball_relaunches_after_scoring() {
        let (mut world, config, map, mut score, mut events, mut rng) = setup_world();
        create_ball(&mut world, Vec2::new(-10.0, 12.0), Vec2::new(-8.0, 0.0), config.ball_size);

        check_scoring(&mut world, &map, &mut score, &mut events, &mut rng, &config);

        for (_entity, ball) in world.query::<&Ball>().iter() {
            assert_eq!(ball.pos, map.ball_spawn(), "Ball should reset to center");
            assert_eq!(ball.vel.x, -config.ball_speed_x, "Serve keeps direction");
            assert!(ball.vel.y.abs() >= config.ball_speed_y * config.relaunch_min_dy - 1e-5);
        }
    }
}
