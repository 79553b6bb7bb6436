//! retrofx Bullets - Pooled projectiles
//!
//! Bullets integrate position once per 1/30 s quantum, cap their speed at
//! the type's mobility and count their lifetime down in quanta. A bullet goes
//! inactive once its lifetime is spent and its flipbooks have stopped; the
//! pool hands inactive bullets back out before allocating new ones.

mod bullet;
mod params;
mod pool;

pub use bullet::{Bullet, TrailHook};
pub use params::{builtin_flipbooks, BulletTable, BulletTypeParams, MAX_BILLBOARDS, NO_TRAIL};
pub use pool::{BulletHandle, BulletPool, FlipbookTemplate};
