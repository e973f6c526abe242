use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Producto {
    pub id: u64,
    pub nombre: String,
    pub precio: f64,
}

/// Owned catalog state: items plus the id counter, injected into the
/// handler layer instead of living as a process-wide singleton. The
/// counter seeds above the largest preloaded id.
#[derive(Debug)]
pub struct ProductCatalog {
    items: Vec<Producto>,
    next_id: u64,
}

impl ProductCatalog {
    pub fn new(items: Vec<Producto>) -> Self {
        let next_id = items.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        Self { items, next_id }
    }

    /// The demo inventory the service ships with.
    pub fn seeded() -> Self {
        Self::new(vec![
            Producto {
                id: 1,
                nombre: "Laptop Dell XPS 15".into(),
                precio: 1899.99,
            },
            Producto {
                id: 2,
                nombre: "Teclado Mecánico Keychron".into(),
                precio: 150.00,
            },
            Producto {
                id: 3,
                nombre: "Mouse Logitech MX Master 3".into(),
                precio: 99.50,
            },
        ])
    }

    pub fn list(&self) -> Vec<Producto> {
        self.items.clone()
    }

    pub fn get(&self, id: u64) -> Option<Producto> {
        self.items.iter().find(|p| p.id == id).cloned()
    }

    pub fn create(&mut self, nombre: String, precio: f64) -> Producto {
        let producto = Producto {
            id: self.next_id,
            nombre,
            precio,
        };
        self.next_id += 1;
        self.items.push(producto.clone());
        producto
    }

    pub fn update(&mut self, id: u64, nombre: String, precio: f64) -> Option<Producto> {
        let producto = self.items.iter_mut().find(|p| p.id == id)?;
        producto.nombre = nombre;
        producto.precio = precio;
        Some(producto.clone())
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|p| p.id != id);
        self.items.len() != before
    }
}
