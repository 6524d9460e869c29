//! # splitpdf-api
//!
//! HTTP front end for the splitpdf library. Every endpoint takes a multipart
//! upload and answers with a ZIP archive named `payslips.zip`.
//!
//! | route          | fields                                    | result                      |
//! |----------------|-------------------------------------------|-----------------------------|
//! | `POST /split`    | `pdfFile`, `fileName?`                  | one PDF per page            |
//! | `POST /download` | `pdfFile`, `selectedPages`, `fileName?` | one PDF with listed pages   |
//! | `POST /delete`   | `pdfFile`, `selectedPages`, `fileName?` | one PDF without listed pages|
//! | `GET /api/health`| none                                    | JSON status                 |

mod api;
pub mod config;
pub mod form;


pub use api::{
    app, delete_pages, download_selected, health_check, router, split_pdf, AppError,
    ErrorResponse,
};
pub use config::ServerConfig;
