use streampdf::{Color, Document, DocumentConfig, Font, GraphicsContext, PageOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Objects are written to the file while the document is being built
    let mut doc = Document::create("hello_world.pdf", DocumentConfig::default())?;
    doc.set_title("Hello World PDF");
    doc.set_author("streampdf");

    doc.add_page(PageOptions::a4())?;

    let mut graphics = GraphicsContext::new();
    graphics
        .set_stroke_color(Color::red())
        .set_line_width(2.0)
        .rect(50.0, 50.0, 200.0, 100.0)
        .stroke()
        .set_fill_color(Color::rgb(0.0, 0.5, 1.0))
        .circle(300.0, 400.0, 50.0)
        .fill();
    doc.draw(&graphics)?;

    doc.font(Font::Helvetica, 24.0)
        .text("¡Hola, mundo!", 100.0, 700.0)?;
    doc.font(Font::TimesRoman, 16.0)
        .text("This is our first streamed PDF document", 100.0, 650.0)?
        .text("created with the streampdf library", 100.0, 620.0)?;

    let state = doc.end()?;
    println!(
        "PDF created: hello_world.pdf ({} bytes, {state})",
        doc.bytes_written()
    );

    Ok(())
}
