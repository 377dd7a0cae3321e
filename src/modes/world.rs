//! Free-roam mode: walking the map and stumbling into wild encounters.

use rand::Rng;
use ratatui::{layout::Rect, Frame};

use super::{Command, Mode, ModeContext, ModeId, RenderView};
use crate::battle::wild_opponent;
use crate::input::LogicalKey;
use crate::world::Direction;

pub struct WorldMode {
    encounter_chance: f64,
}

impl WorldMode {
    pub fn new(encounter_chance: f64) -> Self {
        Self {
            encounter_chance: encounter_chance.clamp(0.0, 1.0),
        }
    }

    fn held_direction(ctx: &ModeContext<'_>) -> Option<Direction> {
        Direction::PRIORITY.into_iter().find(|direction| {
            let key = match direction {
                Direction::Up => LogicalKey::Up,
                Direction::Down => LogicalKey::Down,
                Direction::Left => LogicalKey::Left,
                Direction::Right => LogicalKey::Right,
            };
            ctx.input.is_pressed(key)
        })
    }

    /// Returns true when the player actually moved.
    fn try_move(ctx: &mut ModeContext<'_>, direction: Direction) -> bool {
        let player = &ctx.world.player;
        if !player.can_move(ctx.now_ms) {
            return false;
        }

        let (dx, dy) = direction.delta();
        let (x, y) = (player.x + dx, player.y + dy);
        if !ctx.world.map.is_walkable(x, y) {
            return false;
        }

        let player = &mut ctx.world.player;
        player.x = x;
        player.y = y;
        player.facing = direction;
        player.last_move_ms = ctx.now_ms;
        true
    }
}

impl Mode for WorldMode {
    fn id(&self) -> ModeId {
        ModeId::World
    }

    fn on_enter(&mut self) {
        tracing::debug!("entering world");
    }

    fn update(&mut self, ctx: &mut ModeContext<'_>) {
        if ctx.input.is_pressed(LogicalKey::Back) && ctx.menu_toggle_ready() {
            ctx.request(Command::ChangeMode(ModeId::MainMenu));
            return;
        }

        let Some(direction) = Self::held_direction(ctx) else {
            return;
        };
        if !Self::try_move(ctx, direction) {
            return;
        }

        let (x, y) = (ctx.world.player.x, ctx.world.player.y);
        if !ctx.world.map.is_encounter_tile(x, y) {
            return;
        }
        // Nobody to send out: no roll, no battle.
        let Some(player) = ctx.party.lead().cloned() else {
            return;
        };
        if ctx.rng.gen_bool(self.encounter_chance) {
            let opponent = wild_opponent(ctx.rng);
            ctx.request(Command::StartBattle {
                player: Some(player),
                opponent: Some(opponent),
            });
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &RenderView<'_>) {
        crate::ui::world::draw_world(frame, area, view.world);
    }
}
