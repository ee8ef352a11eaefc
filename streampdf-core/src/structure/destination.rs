//! Explicit destinations according to ISO 32000-1 Section 12.3.2

use crate::objects::{Object, ObjectId};

/// How the target page is displayed.
#[derive(Debug, Clone, PartialEq)]
pub enum DestinationType {
    /// Position (left, top) at the upper-left corner of the window, with zoom
    XYZ {
        left: Option<f64>,
        top: Option<f64>,
        zoom: Option<f64>,
    },
    /// Fit entire page in window
    Fit,
    /// Fit width of page in window
    FitH { top: Option<f64> },
    /// Fit height of page in window
    FitV { left: Option<f64> },
    /// Fit rectangle in window
    FitR {
        left: f64,
        bottom: f64,
        right: f64,
        top: f64,
    },
    /// Fit page bounding box in window
    FitB,
}

/// Target page of a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDestination {
    /// Global page index (0-based), resolved against the pages added so far
    PageIndex(usize),
    /// Page object reference
    PageRef(ObjectId),
}

/// Page plus view.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub page: PageDestination,
    pub dest_type: DestinationType,
}

impl Destination {
    pub fn xyz(
        page: PageDestination,
        left: Option<f64>,
        top: Option<f64>,
        zoom: Option<f64>,
    ) -> Self {
        Self {
            page,
            dest_type: DestinationType::XYZ { left, top, zoom },
        }
    }

    pub fn fit(page: PageDestination) -> Self {
        Self {
            page,
            dest_type: DestinationType::Fit,
        }
    }

    pub fn fit_h(page: PageDestination, top: Option<f64>) -> Self {
        Self {
            page,
            dest_type: DestinationType::FitH { top },
        }
    }

    pub fn fit_v(page: PageDestination, left: Option<f64>) -> Self {
        Self {
            page,
            dest_type: DestinationType::FitV { left },
        }
    }

    pub fn fit_r(page: PageDestination, left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            page,
            dest_type: DestinationType::FitR {
                left,
                bottom,
                right,
                top,
            },
        }
    }

    /// Top of the page with the viewer's current zoom.
    pub fn page_top(page: PageDestination) -> Self {
        Self::xyz(page, None, None, None)
    }

    /// Builds the destination array once the page object is known.
    pub fn to_array(&self, page: ObjectId) -> Vec<Object> {
        fn optional(value: Option<f64>) -> Object {
            value.map(Object::Real).unwrap_or(Object::Null)
        }

        let mut arr = vec![Object::Reference(page)];
        match &self.dest_type {
            DestinationType::XYZ { left, top, zoom } => {
                arr.push(Object::name("XYZ"));
                arr.push(optional(*left));
                arr.push(optional(*top));
                arr.push(optional(*zoom));
            }
            DestinationType::Fit => arr.push(Object::name("Fit")),
            DestinationType::FitH { top } => {
                arr.push(Object::name("FitH"));
                arr.push(optional(*top));
            }
            DestinationType::FitV { left } => {
                arr.push(Object::name("FitV"));
                arr.push(optional(*left));
            }
            DestinationType::FitR {
                left,
                bottom,
                right,
                top,
            } => {
                arr.push(Object::name("FitR"));
                arr.extend([left, bottom, right, top].map(|v| Object::Real(*v)));
            }
            DestinationType::FitB => arr.push(Object::name("FitB")),
        }
        arr
    }
}
