//! Cart Storage
//!
//! Keeps the cart across runs. The stored form is a JSON snapshot tagged with the
//! currency it was priced in.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use rusty_money::iso::{self, Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, CartError, CartLine};

/// Errors raised while loading or saving a cart.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("failed to access cart storage: {0}")]
    Io(#[from] io::Error),

    /// The stored snapshot is not valid JSON.
    #[error("failed to parse stored cart: {0}")]
    Json(#[from] serde_json::Error),

    /// The stored snapshot names a currency this build does not know.
    #[error("stored cart uses unknown currency {0}")]
    UnknownCurrency(String),

    /// The stored snapshot was priced in a different currency.
    #[error("stored cart is priced in {found}, expected {expected}")]
    CurrencyMismatch {
        /// Configured currency
        expected: &'static str,
        /// Currency in the snapshot
        found: String,
    },

    /// The stored lines do not form a valid cart.
    #[error("stored cart is invalid: {0}")]
    Cart(#[from] CartError),
}

/// Somewhere a cart can be kept between runs.
pub trait CartStorage {
    /// Load the saved cart, or an empty one when nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the saved cart cannot be read or does not match `currency`.
    fn load(&self, currency: &'static Currency) -> Result<Cart, StorageError>;

    /// Replace the saved cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart cannot be written.
    fn save(&self, cart: &Cart) -> Result<(), StorageError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct CartSnapshot {
    currency: String,
    lines: Vec<CartLine>,
}

impl CartSnapshot {
    fn from_cart(cart: &Cart) -> Self {
        Self {
            currency: cart.currency().iso_alpha_code.to_string(),
            lines: cart.lines().to_vec(),
        }
    }

    fn into_cart(self, currency: &'static Currency) -> Result<Cart, StorageError> {
        let stored = iso::find(&self.currency)
            .ok_or_else(|| StorageError::UnknownCurrency(self.currency.clone()))?;

        if stored != currency {
            return Err(StorageError::CurrencyMismatch {
                expected: currency.iso_alpha_code,
                found: self.currency,
            });
        }

        Ok(Cart::with_lines(self.lines, currency)?)
    }
}

/// Cart kept in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self, currency: &'static Currency) -> Result<Cart, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(Cart::new(currency));
            }
            Err(error) => return Err(error.into()),
        };

        let snapshot: CartSnapshot = serde_json::from_str(&contents)?;

        snapshot.into_cart(currency)
    }

    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&CartSnapshot::from_cart(cart))?;

        // Write beside the target then rename over it.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

/// Cart kept in memory, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything has been saved.
    pub fn is_saved(&self) -> bool {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, currency: &'static Currency) -> Result<Cart, StorageError> {
        let snapshot = self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match snapshot {
            Some(json) => serde_json::from_str::<CartSnapshot>(&json)?.into_cart(currency),
            None => Ok(Cart::new(currency)),
        }
    }

    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let json = serde_json::to_string(&CartSnapshot::from_cart(cart))?;

        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(json);

        Ok(())
    }
}
