//! Entity subcommands and their dispatch onto the services.

use std::{fmt::Debug, io::Write};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use clap::{Args, Subcommand};
use rideshare_core::{
    Booking, BookingStatus, Entity, Rating, Route, ServiceResult, Services, Trip, TripStatus, User,
};

use crate::CliError;

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Register, show and remove users.
    #[command(subcommand)]
    User(UserCommand),
    /// Inspect the routes written alongside trips.
    #[command(subcommand)]
    Route(RouteCommand),
    /// Publish, show, update and remove trips.
    #[command(subcommand)]
    Trip(TripCommand),
    /// Book, show and cancel seats.
    #[command(subcommand)]
    Booking(BookingCommand),
    /// Leave, show and remove trip ratings.
    #[command(subcommand)]
    Rating(RatingCommand),
}

#[derive(Debug, Subcommand)]
pub(crate) enum UserCommand {
    /// Register a user and print its identifier.
    Add(NewUser),
    /// Print a stored user.
    Show(Target),
    /// Remove a stored user.
    Remove(Target),
}

#[derive(Debug, Subcommand)]
pub(crate) enum RouteCommand {
    /// Print a stored route.
    Show(Target),
}

#[derive(Debug, Subcommand)]
pub(crate) enum TripCommand {
    /// Publish a trip over a new route and print the trip identifier.
    Add(TripDetails),
    /// Print a stored trip.
    Show(Target),
    /// Rewrite a trip and the route it follows.
    Update(TripUpdate),
    /// Remove a stored trip; its route stays.
    Remove(Target),
}

#[derive(Debug, Subcommand)]
pub(crate) enum BookingCommand {
    /// Book seats on a trip and print the booking identifier.
    Add(NewBooking),
    /// Print a stored booking.
    Show(Target),
    /// Remove a stored booking.
    Remove(Target),
}

#[derive(Debug, Subcommand)]
pub(crate) enum RatingCommand {
    /// Rate a trip and print the rating identifier.
    Add(NewRating),
    /// Print a stored rating.
    Show(Target),
    /// Remove a stored rating.
    Remove(Target),
}

#[derive(Debug, Args)]
pub(crate) struct Target {
    /// Identifier printed when the record was added.
    #[arg(value_name = "id")]
    pub(crate) id: String,
}

#[derive(Debug, Args)]
pub(crate) struct NewUser {
    /// Display name.
    #[arg(long)]
    pub(crate) name: String,
    /// Contact email.
    #[arg(long)]
    pub(crate) email: String,
    /// Password, stored as given.
    #[arg(long)]
    pub(crate) password: String,
    /// Date of birth.
    #[arg(long = "birth-date", value_name = "YYYY-MM-DD")]
    pub(crate) birth_date: NaiveDate,
    #[arg(long, default_value_t)]
    pub(crate) gender: String,
    #[arg(long, default_value_t)]
    pub(crate) phone: String,
    #[arg(long, default_value_t)]
    pub(crate) address: String,
    /// Free-text travel preferences.
    #[arg(long, default_value_t)]
    pub(crate) preferences: String,
}

#[derive(Debug, Args)]
pub(crate) struct TripDetails {
    /// Where the route starts.
    #[arg(long = "from")]
    pub(crate) start_point: String,
    /// Where the route ends.
    #[arg(long = "to")]
    pub(crate) end_point: String,
    /// Travel date of the route.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub(crate) date: NaiveDate,
    /// Expected travel time.
    #[arg(long = "duration-minutes", value_name = "minutes")]
    pub(crate) duration_minutes: u32,
    /// Scheduled departure.
    #[arg(long, value_name = "YYYY-MM-DDTHH:MM:SS")]
    pub(crate) departure: NaiveDateTime,
    /// Seats offered to passengers.
    #[arg(long = "max-passengers")]
    pub(crate) max_passengers: u32,
    /// Identifier of the organising user.
    #[arg(long)]
    pub(crate) organiser: String,
}

#[derive(Debug, Args)]
pub(crate) struct TripUpdate {
    /// Trip to rewrite.
    #[arg(value_name = "id")]
    pub(crate) id: String,
    #[command(flatten)]
    pub(crate) details: TripDetails,
    /// Lifecycle state, for example SCHEDULED or COMPLETED.
    #[arg(long, default_value = "SCHEDULED")]
    pub(crate) status: String,
    /// Stop the organiser from editing the trip further.
    #[arg(long)]
    pub(crate) locked: bool,
}

#[derive(Debug, Args)]
pub(crate) struct NewBooking {
    /// Booked trip.
    #[arg(long)]
    pub(crate) trip: String,
    /// Passenger.
    #[arg(long)]
    pub(crate) user: String,
    /// Seats to reserve.
    #[arg(long)]
    pub(crate) seats: u32,
    #[arg(long = "passport-number")]
    pub(crate) passport_number: String,
    #[arg(long = "passport-expiry", value_name = "YYYY-MM-DD")]
    pub(crate) passport_expiry: NaiveDate,
    /// Booking state, for example PENDING or CONFIRMED.
    #[arg(long, default_value = "PENDING")]
    pub(crate) status: String,
    /// Booking date; today when omitted.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub(crate) date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub(crate) struct NewRating {
    /// Rated trip.
    #[arg(long)]
    pub(crate) trip: String,
    /// Score, nominally 1 to 5.
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) score: i32,
    #[arg(long, default_value_t)]
    pub(crate) comment: String,
    /// Rating date; today when omitted.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub(crate) date: Option<NaiveDate>,
}

/// Run `command` against `services`, writing its result to `out`.
///
/// `today` stands in for dates the command leaves unspecified.
pub(crate) fn execute(
    services: &Services,
    command: Command,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::User(action) => user(services, action, out),
        Command::Route(RouteCommand::Show(target)) => show(
            out,
            Entity::Route,
            target,
            |id| services.routes.get_route(id),
        ),
        Command::Trip(action) => trip(services, action, today, out),
        Command::Booking(action) => booking(services, action, today, out),
        Command::Rating(action) => rating(services, action, today, out),
    }
}

fn user(services: &Services, action: UserCommand, out: &mut impl Write) -> Result<(), CliError> {
    match action {
        UserCommand::Add(details) => {
            let user = User {
                gender: details.gender,
                phone: details.phone,
                address: details.address,
                preferences: details.preferences,
                ..User::new(
                    details.name,
                    details.email,
                    details.password,
                    details.birth_date,
                )
            };
            let id = services.users.create_user(&user)?;
            emit(out, &id)
        }
        UserCommand::Show(target) => {
            show(out, Entity::User, target, |id| services.users.get_user(id))
        }
        UserCommand::Remove(target) => {
            services.users.delete_user(&target.id)?;
            removed(out, Entity::User, &target.id)
        }
    }
}

fn trip(
    services: &Services,
    action: TripCommand,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match action {
        TripCommand::Add(details) => {
            let (trip, route) = trip_and_route(&details, today);
            let id = services
                .trips
                .create_trip(&trip, &route, &details.organiser)?;
            emit(out, &id)
        }
        TripCommand::Show(target) => {
            show(out, Entity::Trip, target, |id| services.trips.get_trip(id))
        }
        TripCommand::Update(update) => {
            let existing = services
                .trips
                .get_trip(&update.id)?
                .ok_or_else(|| CliError::NotFound {
                    entity: Entity::Trip,
                    id: update.id.clone(),
                })?;
            let (mut trip, route) = trip_and_route(&update.details, existing.creation_date);
            trip.id = Some(update.id.clone());
            trip.status = TripStatus::from(update.status.as_str());
            trip.editable = !update.locked;
            services
                .trips
                .update_trip(&trip, &route, &update.details.organiser)?;
            writeln!(out, "updated trip {}", update.id).map_err(CliError::Output)
        }
        TripCommand::Remove(target) => {
            services.trips.delete_trip(&target.id)?;
            removed(out, Entity::Trip, &target.id)
        }
    }
}

fn trip_and_route(details: &TripDetails, creation_date: NaiveDate) -> (Trip, Route) {
    let route = Route::new(
        details.start_point.clone(),
        details.end_point.clone(),
        details.date,
        TimeDelta::minutes(i64::from(details.duration_minutes)),
    );
    let trip = Trip::new(details.departure, details.max_passengers, creation_date);
    (trip, route)
}

fn booking(
    services: &Services,
    action: BookingCommand,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match action {
        BookingCommand::Add(details) => {
            let booking = Booking {
                id: None,
                seat_count: details.seats,
                status: BookingStatus::from(details.status.as_str()),
                booking_date: details.date.unwrap_or(today),
                passport_number: details.passport_number,
                passport_expiry_date: details.passport_expiry,
                trip_id: details.trip,
                user_id: details.user,
            };
            let id = services.bookings.create_booking(&booking)?;
            emit(out, &id)
        }
        BookingCommand::Show(target) => show(out, Entity::Booking, target, |id| {
            services.bookings.get_booking(id)
        }),
        BookingCommand::Remove(target) => {
            services.bookings.delete_booking(&target.id)?;
            removed(out, Entity::Booking, &target.id)
        }
    }
}

fn rating(
    services: &Services,
    action: RatingCommand,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match action {
        RatingCommand::Add(details) => {
            let rating = Rating {
                id: None,
                score: details.score,
                comment: details.comment,
                date: details.date.unwrap_or(today),
                trip_id: details.trip,
            };
            let id = services.ratings.create_rating(&rating)?;
            emit(out, &id)
        }
        RatingCommand::Show(target) => show(out, Entity::Rating, target, |id| {
            services.ratings.get_rating(id)
        }),
        RatingCommand::Remove(target) => {
            services.ratings.delete_rating(&target.id)?;
            removed(out, Entity::Rating, &target.id)
        }
    }
}

fn show<T, F>(out: &mut impl Write, entity: Entity, target: Target, fetch: F) -> Result<(), CliError>
where
    T: Debug,
    F: FnOnce(&str) -> ServiceResult<Option<T>>,
{
    let Some(found) = fetch(&target.id)? else {
        return Err(CliError::NotFound {
            entity,
            id: target.id,
        });
    };
    writeln!(out, "{found:#?}").map_err(CliError::Output)
}

fn emit(out: &mut impl Write, id: &str) -> Result<(), CliError> {
    writeln!(out, "{id}").map_err(CliError::Output)
}

fn removed(out: &mut impl Write, entity: Entity, id: &str) -> Result<(), CliError> {
    writeln!(out, "removed {entity} {id}").map_err(CliError::Output)
}
