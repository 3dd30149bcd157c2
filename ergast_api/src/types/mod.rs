mod meta;
pub use self::meta::{MrData, PaginatedResponse, Response};

mod driver;
pub use self::driver::{Constructor, Driver, DriverID, DriverTable};

mod standings;
pub use self::standings::{DriverStanding, StandingsList, StandingsTable};

mod race;
pub use self::race::{Race, RaceResult, RaceTable};
