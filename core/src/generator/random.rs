use super::*;

/// Uniform generation strategy: `config.mines` distinct playable cells, every subset equally likely.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: BoardConfig, doors: Doors) -> Result<Board> {
        use rand::prelude::*;

        config.validate()?;

        let playable = config.playable();
        if config.mines == 0 {
            log::warn!("Board has no mines, it is solved as soon as it is entered");
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let height = usize::from(playable.height());
        let picks = rand::seq::index::sample(
            &mut rng,
            usize::from(playable.area()),
            usize::from(config.mines),
        );
        let mines = picks.into_iter().map(|index| {
            (
                playable.min.0 + (index / height) as Coord,
                playable.min.1 + (index % height) as Coord,
            )
        });

        Board::populate(config, doors, mines)
    }
}
