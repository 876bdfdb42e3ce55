//! Database operations for service (repair) orders.

use rusqlite::{Connection, Row, params};
use time::Date;

use crate::{
    Error,
    database_id::{CustomerId, ServiceId},
};

/// The lifecycle status of a service order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// The scooter has been booked in but work has not started.
    Pending,
    /// The scooter is being worked on.
    InProgress,
    /// The work is done and the income has been recorded.
    Completed,
    /// The order was cancelled before completion.
    Cancelled,
}

impl ServiceStatus {
    /// The string stored in the database for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status from its database or form representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// A human readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether the order has been closed, either by completion or cancellation.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repair order for a customer's scooter.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    /// The ID of the service order.
    pub id: ServiceId,
    /// The customer whose scooter is being serviced.
    pub customer_id: CustomerId,
    /// A short description of the scooter, e.g. "Vespa GTS 300".
    pub vehicle: String,
    /// What the customer reported as wrong.
    pub problem: String,
    /// The quoted cost of the work in dollars.
    pub cost: f64,
    /// The lifecycle status of the order.
    pub status: ServiceStatus,
    /// When the order was opened.
    pub opened_on: Date,
    /// When the order was completed, if it has been.
    pub completed_on: Option<Date>,
}

/// The form data for creating or updating a service order.
#[derive(Debug, serde::Deserialize)]
pub struct ServiceFormData {
    /// The customer whose scooter is being serviced.
    pub customer_id: CustomerId,
    /// A short description of the scooter.
    pub vehicle: String,
    /// What the customer reported as wrong.
    #[serde(default)]
    pub problem: String,
    /// The quoted cost of the work in dollars.
    pub cost: f64,
    /// The status selected in the edit form. Ignored on creation.
    #[serde(default)]
    pub status: Option<String>,
}

/// Initialize the service table.
pub fn create_service_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS service (
            id INTEGER PRIMARY KEY,
            customer_id INTEGER NOT NULL,
            vehicle TEXT NOT NULL,
            problem TEXT NOT NULL DEFAULT '',
            cost REAL NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'pending',
            opened_on TEXT NOT NULL,
            completed_on TEXT,
            FOREIGN KEY(customer_id) REFERENCES customer(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

/// Create a service order and return it with its generated ID.
///
/// New orders start pending and open on `today`.
///
/// # Errors
/// Returns [Error::EmptyVehicle] if the vehicle description is blank.
pub fn create_service(
    form: &ServiceFormData,
    today: Date,
    connection: &Connection,
) -> Result<Service, Error> {
    let vehicle = form.vehicle.trim();

    if vehicle.is_empty() {
        return Err(Error::EmptyVehicle);
    }

    connection.execute(
        "INSERT INTO service (customer_id, vehicle, problem, cost, status, opened_on) \
        VALUES (?1, ?2, ?3, ?4, 'pending', ?5)",
        params![form.customer_id, vehicle, form.problem, form.cost, today],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Service {
        id,
        customer_id: form.customer_id,
        vehicle: vehicle.to_owned(),
        problem: form.problem.clone(),
        cost: form.cost,
        status: ServiceStatus::Pending,
        opened_on: today,
        completed_on: None,
    })
}

/// Retrieve a single service order by ID.
pub fn get_service(service_id: ServiceId, connection: &Connection) -> Result<Service, Error> {
    connection
        .prepare(
            "SELECT id, customer_id, vehicle, problem, cost, status, opened_on, completed_on \
            FROM service WHERE id = :id;",
        )?
        .query_row(&[(":id", &service_id)], map_row)
        .map_err(|error| error.into())
}

/// A service order together with its customer's name, for the services page.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceListEntry {
    pub service: Service,
    pub customer_name: String,
}

/// Retrieve all service orders with their customer names, newest first.
pub fn get_all_services(connection: &Connection) -> Result<Vec<ServiceListEntry>, Error> {
    connection
        .prepare(
            "SELECT s.id, s.customer_id, s.vehicle, s.problem, s.cost, s.status, s.opened_on, \
            s.completed_on, c.name \
            FROM service s INNER JOIN customer c ON s.customer_id = c.id \
            ORDER BY s.id DESC;",
        )?
        .query_map([], |row| {
            let service = map_row(row)?;
            let customer_name: String = row.get(8)?;

            Ok(ServiceListEntry {
                service,
                customer_name,
            })
        })?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// Update a service order's details.
///
/// The status may be moved between the open states and cancelled via the edit
/// form; completion goes through [complete_service] so that the income is
/// recorded exactly once.
///
/// # Errors
/// Returns:
/// - [Error::UpdateMissingService] if the order doesn't exist.
/// - [Error::ServiceAlreadyClosed] if the order is already completed.
/// - [Error::EmptyVehicle] if the vehicle description is blank.
pub fn update_service(
    service_id: ServiceId,
    form: &ServiceFormData,
    connection: &Connection,
) -> Result<(), Error> {
    let vehicle = form.vehicle.trim();

    if vehicle.is_empty() {
        return Err(Error::EmptyVehicle);
    }

    let existing = match get_service(service_id, connection) {
        Ok(service) => service,
        Err(Error::NotFound) => return Err(Error::UpdateMissingService),
        Err(error) => return Err(error),
    };

    if existing.status == ServiceStatus::Completed {
        return Err(Error::ServiceAlreadyClosed);
    }

    let status = match form.status.as_deref() {
        Some(value) => match ServiceStatus::parse(value) {
            // The edit form cannot complete an order.
            Some(ServiceStatus::Completed) | None => existing.status,
            Some(status) => status,
        },
        None => existing.status,
    };

    connection.execute(
        "UPDATE service SET customer_id = ?1, vehicle = ?2, problem = ?3, cost = ?4, status = ?5 \
        WHERE id = ?6",
        params![
            form.customer_id,
            vehicle,
            form.problem,
            form.cost,
            status.as_str(),
            service_id
        ],
    )?;

    Ok(())
}

/// Mark a service order as completed as of `today`.
///
/// The caller is responsible for recording the matching income transaction
/// and refreshing targets afterwards.
///
/// # Errors
/// Returns:
/// - [Error::NotFound] if the order doesn't exist.
/// - [Error::ServiceAlreadyClosed] if the order is already completed or
///   cancelled.
pub fn complete_service(
    service_id: ServiceId,
    today: Date,
    connection: &Connection,
) -> Result<Service, Error> {
    let service = get_service(service_id, connection)?;

    if service.status.is_closed() {
        return Err(Error::ServiceAlreadyClosed);
    }

    connection.execute(
        "UPDATE service SET status = 'completed', completed_on = ?1 WHERE id = ?2",
        params![today, service_id],
    )?;

    Ok(Service {
        status: ServiceStatus::Completed,
        completed_on: Some(today),
        ..service
    })
}

/// Delete a service order by ID. Returns an error if the order doesn't exist.
pub fn delete_service(service_id: ServiceId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM service WHERE id = ?1", [service_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingService);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Service, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_status: String = row.get(5)?;
    let status = ServiceStatus::parse(&raw_status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            Box::from(format!("unknown service status \"{raw_status}\"")),
        )
    })?;

    Ok(Service {
        id,
        customer_id: row.get(1)?,
        vehicle: row.get(2)?,
        problem: row.get(3)?,
        cost: row.get(4)?,
        status,
        opened_on: row.get(6)?,
        completed_on: row.get(7)?,
    })
}

#[cfg(test)]
mod service_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        customer::{CustomerFormData, create_customer, create_customer_table},
        service::{
            ServiceFormData, ServiceStatus, complete_service, create_service, delete_service,
            get_all_services, get_service, update_service,
        },
    };

    use super::create_service_table;

    const TODAY: time::Date = date!(2025 - 06 - 15);

    fn get_test_db_connection() -> (Connection, i64) {
        let connection = Connection::open_in_memory().unwrap();
        create_customer_table(&connection).expect("Could not create customer table");
        create_service_table(&connection).expect("Could not create service table");

        let customer = create_customer(
            &CustomerFormData {
                name: "Mere Brown".to_owned(),
                phone: "0211234567".to_owned(),
                email: "".to_owned(),
                address: "".to_owned(),
                notes: "".to_owned(),
            },
            &connection,
        )
        .expect("Could not create customer");

        (connection, customer.id)
    }

    fn test_form(customer_id: i64, vehicle: &str, cost: f64) -> ServiceFormData {
        ServiceFormData {
            customer_id,
            vehicle: vehicle.to_owned(),
            problem: "Won't start".to_owned(),
            cost,
            status: None,
        }
    }

    #[test]
    fn create_service_starts_pending() {
        let (connection, customer_id) = get_test_db_connection();

        let service = create_service(
            &test_form(customer_id, "Vespa GTS 300", 180.0),
            TODAY,
            &connection,
        )
        .expect("Could not create service");

        assert!(service.id > 0);
        assert_eq!(service.status, ServiceStatus::Pending);
        assert_eq!(service.opened_on, TODAY);
        assert_eq!(service.completed_on, None);
    }

    #[test]
    fn create_service_rejects_blank_vehicle() {
        let (connection, customer_id) = get_test_db_connection();

        let result = create_service(&test_form(customer_id, "  ", 180.0), TODAY, &connection);

        assert_eq!(result, Err(Error::EmptyVehicle));
    }

    #[test]
    fn get_service_round_trips() {
        let (connection, customer_id) = get_test_db_connection();
        let inserted = create_service(
            &test_form(customer_id, "Vespa GTS 300", 180.0),
            TODAY,
            &connection,
        )
        .unwrap();

        let selected = get_service(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_all_services_includes_customer_name() {
        let (connection, customer_id) = get_test_db_connection();
        create_service(
            &test_form(customer_id, "Vespa GTS 300", 180.0),
            TODAY,
            &connection,
        )
        .unwrap();

        let entries = get_all_services(&connection).expect("Could not get services");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].customer_name, "Mere Brown");
    }

    #[test]
    fn update_service_changes_details_and_open_status() {
        let (connection, customer_id) = get_test_db_connection();
        let service = create_service(
            &test_form(customer_id, "Vespa GTS 300", 180.0),
            TODAY,
            &connection,
        )
        .unwrap();

        let mut form = test_form(customer_id, "Vespa GTS 300", 220.0);
        form.status = Some("in_progress".to_owned());
        update_service(service.id, &form, &connection).expect("Could not update service");

        let updated = get_service(service.id, &connection).unwrap();
        assert_eq!(updated.cost, 220.0);
        assert_eq!(updated.status, ServiceStatus::InProgress);
    }

    #[test]
    fn update_service_cannot_complete_an_order() {
        let (connection, customer_id) = get_test_db_connection();
        let service = create_service(
            &test_form(customer_id, "Vespa GTS 300", 180.0),
            TODAY,
            &connection,
        )
        .unwrap();

        let mut form = test_form(customer_id, "Vespa GTS 300", 180.0);
        form.status = Some("completed".to_owned());
        update_service(service.id, &form, &connection).unwrap();

        let updated = get_service(service.id, &connection).unwrap();
        assert_eq!(updated.status, ServiceStatus::Pending);
    }

    #[test]
    fn update_completed_service_is_rejected() {
        let (connection, customer_id) = get_test_db_connection();
        let service = create_service(
            &test_form(customer_id, "Vespa GTS 300", 180.0),
            TODAY,
            &connection,
        )
        .unwrap();
        complete_service(service.id, TODAY, &connection).unwrap();

        let result = update_service(
            service.id,
            &test_form(customer_id, "Vespa GTS 300", 500.0),
            &connection,
        );

        assert_eq!(result, Err(Error::ServiceAlreadyClosed));
    }

    #[test]
    fn update_missing_service_returns_error() {
        let (connection, customer_id) = get_test_db_connection();

        let result = update_service(
            999999,
            &test_form(customer_id, "Vespa GTS 300", 180.0),
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingService));
    }

    #[test]
    fn complete_service_stamps_completion_date() {
        let (connection, customer_id) = get_test_db_connection();
        let service = create_service(
            &test_form(customer_id, "Vespa GTS 300", 180.0),
            TODAY,
            &connection,
        )
        .unwrap();

        let completed = complete_service(service.id, TODAY, &connection)
            .expect("Could not complete service");

        assert_eq!(completed.status, ServiceStatus::Completed);
        assert_eq!(completed.completed_on, Some(TODAY));

        let stored = get_service(service.id, &connection).unwrap();
        assert_eq!(stored.status, ServiceStatus::Completed);
        assert_eq!(stored.completed_on, Some(TODAY));
    }

    #[test]
    fn complete_service_twice_is_rejected() {
        let (connection, customer_id) = get_test_db_connection();
        let service = create_service(
            &test_form(customer_id, "Vespa GTS 300", 180.0),
            TODAY,
            &connection,
        )
        .unwrap();
        complete_service(service.id, TODAY, &connection).unwrap();

        let result = complete_service(service.id, TODAY, &connection);

        assert_eq!(result, Err(Error::ServiceAlreadyClosed));
    }

    #[test]
    fn complete_cancelled_service_is_rejected() {
        let (connection, customer_id) = get_test_db_connection();
        let service = create_service(
            &test_form(customer_id, "Vespa GTS 300", 180.0),
            TODAY,
            &connection,
        )
        .unwrap();

        let mut form = test_form(customer_id, "Vespa GTS 300", 180.0);
        form.status = Some("cancelled".to_owned());
        update_service(service.id, &form, &connection).unwrap();

        let result = complete_service(service.id, TODAY, &connection);

        assert_eq!(result, Err(Error::ServiceAlreadyClosed));
    }

    #[test]
    fn delete_service_succeeds() {
        let (connection, customer_id) = get_test_db_connection();
        let service = create_service(
            &test_form(customer_id, "Vespa GTS 300", 180.0),
            TODAY,
            &connection,
        )
        .unwrap();

        delete_service(service.id, &connection).expect("Could not delete service");

        assert_eq!(get_service(service.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_service_returns_error() {
        let (connection, _) = get_test_db_connection();

        assert_eq!(
            delete_service(42, &connection),
            Err(Error::DeleteMissingService)
        );
    }
}
