use crate::catalog::circuit::CircuitIdentity;

macro_rules! image {
    ($file:literal) => {
        concat!(
            "https://media.formula1.com/content/dam/fom-website/2018-redesign-assets/Racehub%20header%20images%2016x9/",
            $file
        )
    };
}

/// Circuits shown on the dashboard, in display order.
pub static CIRCUITS: [CircuitIdentity; 10] = [
    CircuitIdentity {
        id: "monaco",
        name: "Monaco Grand Prix",
        location: "Monte Carlo",
        country: "Monaco",
        length_km: 3.337,
        corners: 19,
        image_ref: image!("Monaco.jpg"),
    },
    CircuitIdentity {
        id: "spa",
        name: "Circuit de Spa-Francorchamps",
        location: "Stavelot",
        country: "Belgium",
        length_km: 7.004,
        corners: 20,
        image_ref: image!("Belgium.jpg"),
    },
    CircuitIdentity {
        id: "silverstone",
        name: "Silverstone Circuit",
        location: "Silverstone",
        country: "UK",
        length_km: 5.891,
        corners: 18,
        image_ref: image!("Great%20Britain.jpg"),
    },
    CircuitIdentity {
        id: "monza",
        name: "Autodromo Nazionale di Monza",
        location: "Monza",
        country: "Italy",
        length_km: 5.793,
        corners: 11,
        image_ref: image!("Italy.jpg"),
    },
    CircuitIdentity {
        id: "interlagos",
        name: "Autódromo José Carlos Pace",
        location: "São Paulo",
        country: "Brazil",
        length_km: 4.309,
        corners: 15,
        image_ref: image!("Brazil.jpg"),
    },
    CircuitIdentity {
        id: "baku",
        name: "Baku City Circuit",
        location: "Baku",
        country: "Azerbaijan",
        length_km: 6.003,
        corners: 20,
        image_ref: image!("Azerbaijan.jpg"),
    },
    CircuitIdentity {
        id: "singapore",
        name: "Marina Bay Street Circuit",
        location: "Marina Bay",
        country: "Singapore",
        length_km: 5.063,
        corners: 23,
        image_ref: image!("Singapore.jpg"),
    },
    CircuitIdentity {
        id: "suzuka",
        name: "Suzuka International Racing Course",
        location: "Suzuka",
        country: "Japan",
        length_km: 5.807,
        corners: 18,
        image_ref: image!("Japan.jpg"),
    },
    CircuitIdentity {
        id: "jeddah",
        name: "Jeddah Corniche Circuit",
        location: "Jeddah",
        country: "Saudi Arabia",
        length_km: 6.174,
        corners: 27,
        image_ref: image!("Saudi%20Arabia.jpg"),
    },
    CircuitIdentity {
        id: "las_vegas",
        name: "Las Vegas Strip Circuit",
        location: "Las Vegas",
        country: "USA",
        length_km: 6.201,
        corners: 17,
        image_ref: image!("Las%20Vegas.jpg"),
    },
];

/// Read-only view over a circuit table.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    circuits: &'static [CircuitIdentity],
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            circuits: &CIRCUITS,
        }
    }

    pub fn from_static(circuits: &'static [CircuitIdentity]) -> Self {
        Self { circuits }
    }

    pub fn all(&self) -> &'static [CircuitIdentity] {
        self.circuits
    }

    pub fn first(&self) -> Option<&'static CircuitIdentity> {
        self.circuits.first()
    }

    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&'static CircuitIdentity> {
        self.circuits.iter().find(|circuit| circuit.id == id)
    }

    /// Resolves a model-supplied key that may be either an id or a display name.
    pub fn resolve(&self, key: &str) -> Option<&'static CircuitIdentity> {
        self.circuits.iter().find(|circuit| circuit.matches_key(key))
    }

    /// Display names of the first `limit` circuits.
    pub fn leading_names(&self, limit: usize) -> Vec<String> {
        self.circuits
            .iter()
            .take(limit)
            .map(|circuit| circuit.name.to_string())
            .collect()
    }

    /// Search-box filter; keeps catalog order.
    pub fn filter(&self, query: &str) -> Vec<&'static CircuitIdentity> {
        self.circuits
            .iter()
            .filter(|circuit| circuit.matches_query(query))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
