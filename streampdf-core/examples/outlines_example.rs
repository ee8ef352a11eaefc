//! Example demonstrating document outlines (bookmarks)
//!
//! Pages are buffered so the table of contents on page 1 can be written
//! after the chapters it lists have been laid out.

use streampdf::{
    Color, Destination, Document, DocumentConfig, Font, OutlineOptions, PageDestination,
    PageOptions,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Creating PDF with document outlines (bookmarks)...");

    let config = DocumentConfig::default().with_buffer_pages(true);
    let mut doc = Document::create("outlines_example.pdf", config)?;
    doc.set_title("Document Outlines Example");
    doc.set_author("streampdf");
    doc.subscribe(|event| println!("  event: {event:?}"));

    doc.add_page(PageOptions::a4())?;
    doc.font(Font::Helvetica, 24.0)
        .text("Document with Bookmarks", 50.0, 750.0)?;
    doc.add_outline("Title Page", None, OutlineOptions::default().bold())?;

    let chapters = [
        ("Chapter 1: Introduction", &["Background", "Objectives"][..]),
        ("Chapter 2: Methods", &["Data Collection", "Analysis"][..]),
        ("Chapter 3: Results", &[][..]),
    ];

    for (title, sections) in chapters {
        doc.add_page(PageOptions::a4())?;
        doc.font(Font::HelveticaBold, 20.0).text(title, 50.0, 750.0)?;
        doc.add_outline(
            title,
            None,
            OutlineOptions::default().with_color(Color::rgb(0.0, 0.0, 0.8)),
        )?;

        if sections.is_empty() {
            continue;
        }
        doc.enter_outline_level()?;
        for section in sections {
            doc.add_page(PageOptions::a4())?;
            doc.font(Font::HelveticaBold, 16.0)
                .text(section, 50.0, 750.0)?;
            doc.font(Font::Helvetica, 12.0)
                .text("Section content goes here.", 50.0, 700.0)?;
            doc.add_outline(section, None, OutlineOptions::default().closed())?;
        }
        doc.exit_outline_level()?;
    }

    // Back to the first page, still in the buffer, for the contents list
    doc.switch_to_page(0)?;
    doc.font(Font::Helvetica, 12.0);
    let mut y = 680.0;
    for (title, _) in chapters {
        doc.text(title, 70.0, y)?;
        y -= 18.0;
    }

    doc.add_outline(
        "Back to Results",
        Some(Destination::fit(PageDestination::PageIndex(doc.page_count() - 1))),
        OutlineOptions::default().italic(),
    )?;

    doc.end()?;
    println!("Created outlines_example.pdf with {} pages", doc.page_count());
    Ok(())
}
