//! Server-rendered page. One template for every theme.

use crate::catalog::{
    Product, CHEMICAL_SOLUTIONS, CONTACT, DETECTION_STEPS, LANGUAGES, ORGANIC_SOLUTIONS, PRODUCTS,
    TESTIMONIALS,
};
use crate::render::{escape_html, render_result_html};
use crate::state::PipelineState;
use crate::theme::Theme;

const BRAND: &str = "Kaustubh Agri";

pub struct PageContext<'a> {
    pub state: &'a PipelineState,
    pub theme: Theme,
    pub model_name: &'a str,
    pub year: i32,
}

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            background: var(--background);
            color: var(--text);
            line-height: 1.6;
        }
        a { color: inherit; }
        header { background: var(--primary-dark); color: white; position: sticky; top: 0; z-index: 50; }
        .bar { max-width: 1100px; margin: 0 auto; padding: 16px 20px; display: flex; justify-content: space-between; align-items: center; }
        .brand { font-size: 1.5em; font-weight: 700; }
        nav a { margin-left: 24px; text-decoration: none; }
        nav a:hover { color: var(--accent); }
        .hero { background: linear-gradient(180deg, var(--primary-dark) 0%, var(--primary) 100%); color: white; padding: 64px 20px; }
        .hero-inner { max-width: 1100px; margin: 0 auto; }
        .hero h1 { font-size: 2.6em; line-height: 1.2; margin-bottom: 16px; }
        .hero p { font-size: 1.2em; margin-bottom: 28px; }
        .hero .cta { display: inline-block; background: white; color: var(--primary-dark); padding: 14px 28px; border-radius: 8px; text-decoration: none; font-weight: 600; margin-right: 12px; }
        main { max-width: 1100px; margin: 0 auto; padding: 48px 20px; }
        section { margin-bottom: 64px; scroll-margin-top: 80px; }
        h2 { color: var(--primary-dark); text-align: center; font-size: 2em; margin-bottom: 28px; }
        .card { background: white; border: 1px solid var(--accent); border-radius: 14px; box-shadow: 0 6px 20px rgba(0,0,0,0.08); margin-bottom: 28px; overflow: hidden; }
        .card-header { background: var(--surface); padding: 18px 24px; color: var(--primary-dark); font-weight: 700; font-size: 1.4em; }
        .card-body { padding: 24px; }
        label { display: block; font-weight: 500; margin-bottom: 8px; }
        input[type="file"], select, input[type="text"], input[type="email"], textarea { width: 100%; padding: 10px; border: 1px solid #d1d5db; border-radius: 8px; font-size: 1em; margin-bottom: 16px; }
        .preview { display: block; margin: 0 auto 20px; max-width: 300px; border-radius: 10px; box-shadow: 0 4px 15px rgba(0,0,0,0.1); }
        button { cursor: pointer; font-size: 1em; border-radius: 8px; }
        .primary { width: 100%; padding: 16px; background: var(--primary); color: white; border: none; font-size: 1.1em; }
        .primary:disabled { opacity: 0.5; cursor: not-allowed; }
        .result-heading { color: var(--primary); font-size: 1.25em; margin: 16px 0 8px; }
        .result-list { margin: 0 0 8px; padding-left: 18px; }
        .result-item { margin: 0 0 8px; }
        .result-text { margin-bottom: 8px; }
        .questions { list-style: none; margin-top: 24px; }
        .questions li { margin-bottom: 8px; }
        .question { width: 100%; text-align: left; padding: 10px 14px; background: white; border: 1px solid var(--accent); }
        .question:hover { background: var(--surface); }
        .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); gap: 24px; }
        .step-number { font-size: 2em; font-weight: 700; color: var(--primary); }
        .checklist { list-style: none; }
        .checklist li::before { content: "✓ "; color: var(--primary); font-weight: 700; }
        .product img { width: 100%; height: 260px; object-fit: contain; }
        .stars { color: #facc15; }
        .stars .off { color: #d1d5db; }
        .badge { display: inline-block; background: #eab308; color: white; padding: 2px 10px; border-radius: 20px; font-size: 0.8em; font-weight: 600; margin-left: 8px; }
        .price { font-size: 1.6em; font-weight: 700; color: var(--primary); }
        .buy { display: inline-block; background: var(--primary); color: white; padding: 10px 18px; border-radius: 8px; text-decoration: none; }
        blockquote { font-style: italic; margin-bottom: 10px; }
        .muted { color: #6b7280; font-size: 0.9em; }
        footer { background: var(--primary-dark); color: white; padding: 32px 20px; }
        footer .inner { max-width: 1100px; margin: 0 auto; }
        footer .copy { border-top: 1px solid var(--primary); margin-top: 24px; padding-top: 16px; text-align: center; font-size: 0.85em; color: var(--accent); }
"#;

const SCRIPT: &str = r#"
        const fileInput = document.getElementById('image-upload');
        const submit = document.getElementById('identify');
        const form = document.getElementById('identify-form');
        fileInput.addEventListener('change', () => {
            if (fileInput.files.length > 0) {
                submit.disabled = false;
            }
        });
        form.addEventListener('submit', () => {
            submit.disabled = true;
            submit.textContent = 'Analyzing...';
        });
"#;

pub fn render_page(ctx: &PageContext<'_>) -> String {
    let mut html = String::with_capacity(32 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!(
        "    <title>{} - Crop Disease Detection</title>\n",
        BRAND
    ));
    html.push_str(&format!(
        "    <style>\n        {}\n{}    </style>\n",
        ctx.theme.css_variables(),
        STYLE
    ));
    html.push_str(&format!(
        "</head>\n<body class=\"theme-{}\">\n",
        ctx.theme.as_str()
    ));

    html.push_str(&render_header());
    html.push_str(&render_hero());
    html.push_str("<main>\n");
    html.push_str(&render_detection(ctx));
    html.push_str(&render_services());
    html.push_str(&render_products());
    html.push_str(&render_testimonials());
    html.push_str(&render_contact());
    html.push_str("</main>\n");
    html.push_str(&render_footer(ctx.year));
    html.push_str(&format!("<script>{}</script>\n", SCRIPT));
    html.push_str("</body>\n</html>\n");

    html
}

fn render_header() -> String {
    format!(
        r##"<header>
    <div class="bar">
        <div class="brand">🌿 {brand}</div>
        <nav>
            <a href="#">Home</a>
            <a href="#services">Services</a>
            <a href="#product-catalog">Products</a>
            <a href="#contact">Contact</a>
        </nav>
    </div>
</header>
"##,
        brand = BRAND
    )
}

fn render_hero() -> String {
    format!(
        r##"<div class="hero">
    <div class="hero-inner">
        <h1>Protect Your Crops with AI-Powered Disease Detection</h1>
        <p>Upload a photo of your crop and get instant disease identification and treatment recommendations.</p>
        <a class="cta" href="#disease-detection">Get Started</a>
        <a class="cta" href="{whatsapp}">Whatsapp channel</a>
    </div>
</div>
"##,
        whatsapp = escape_html(CONTACT.whatsapp_channel)
    )
}

fn render_detection(ctx: &PageContext<'_>) -> String {
    let state = ctx.state;
    let mut html = String::new();

    html.push_str("<section id=\"disease-detection\">\n");
    html.push_str("    <div class=\"card\">\n        <div class=\"card-header\">Identify Crop Diseases</div>\n        <div class=\"card-body\">\n");
    html.push_str("            <form id=\"identify-form\" action=\"/identify\" method=\"post\" enctype=\"multipart/form-data\">\n");
    html.push_str("                <label for=\"image-upload\">Upload an image of your crop</label>\n");
    html.push_str("                <input id=\"image-upload\" type=\"file\" name=\"image\" accept=\"image/*\" aria-label=\"Upload crop image\">\n");

    if let Some(image) = &state.image {
        html.push_str(&format!(
            "                <img class=\"preview\" src=\"/image?v={}\" alt=\"Uploaded crop image: {}\">\n",
            state.generation,
            escape_html(&image.file_name)
        ));
    }

    let disabled = if state.can_submit() { "" } else { " disabled" };
    let label = if state.pending {
        "Analyzing..."
    } else {
        "Identify Disease"
    };
    html.push_str(&format!(
        "                <button id=\"identify\" class=\"primary\" type=\"submit\" aria-label=\"Identify disease\"{}>{}</button>\n",
        disabled, label
    ));
    html.push_str("            </form>\n");

    html.push_str("            <form action=\"/language\" method=\"post\" style=\"margin-top: 20px;\">\n");
    html.push_str("                <label for=\"language\">Related questions language</label>\n");
    html.push_str("                <select id=\"language\" name=\"language\" onchange=\"this.form.submit()\">\n");
    for language in LANGUAGES {
        let selected = if language.eq_ignore_ascii_case(&state.language) {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            "                    <option value=\"{lang}\"{selected}>{label}</option>\n",
            lang = language,
            selected = selected,
            label = capitalize(language)
        ));
    }
    html.push_str("                </select>\n            </form>\n");
    html.push_str("        </div>\n    </div>\n");

    if let Some(result) = &state.result {
        html.push_str("    <div class=\"card\" id=\"result\">\n        <div class=\"card-header\">Disease Information:</div>\n        <div class=\"card-body\">\n");
        html.push_str(&render_result_html(result));

        if !state.follow_up_questions.is_empty() {
            html.push_str("            <h4 class=\"result-heading\">Related Questions:</h4>\n");
            html.push_str("            <ul class=\"questions\">\n");
            for question in &state.follow_up_questions {
                let question = escape_html(question);
                html.push_str(&format!(
                    "                <li><form action=\"/ask\" method=\"post\"><input type=\"hidden\" name=\"question\" value=\"{q}\"><button class=\"question\" type=\"submit\">{q}</button></form></li>\n",
                    q = question
                ));
            }
            html.push_str("            </ul>\n");
        }

        html.push_str(&format!(
            "            <p class=\"muted\">Model: {}</p>\n",
            escape_html(ctx.model_name)
        ));
        html.push_str("        </div>\n    </div>\n");
    }

    html.push_str("</section>\n");
    html
}

fn render_services() -> String {
    let mut html = String::new();
    html.push_str("<section id=\"services\">\n    <h2>Our Services</h2>\n");
    html.push_str("    <div class=\"card\">\n        <div class=\"card-header\">AI-Powered Crop Disease Detection</div>\n        <div class=\"card-body grid\">\n");
    for (index, step) in DETECTION_STEPS.iter().enumerate() {
        html.push_str(&format!(
            "            <div><div class=\"step-number\">{}</div><h3>{}</h3><p class=\"muted\">{}</p></div>\n",
            index + 1,
            escape_html(step.title),
            escape_html(step.description)
        ));
    }
    html.push_str("        </div>\n    </div>\n");

    html.push_str("    <div class=\"card\">\n        <div class=\"card-header\">Customized Treatment Solutions</div>\n        <div class=\"card-body grid\">\n");
    for (title, items) in [
        ("Organic Solutions", ORGANIC_SOLUTIONS),
        ("Chemical Solutions", CHEMICAL_SOLUTIONS),
    ] {
        html.push_str(&format!("            <div><h3>{}</h3><ul class=\"checklist\">\n", title));
        for item in items {
            html.push_str(&format!("                <li>{}</li>\n", escape_html(item)));
        }
        html.push_str("            </ul></div>\n");
    }
    html.push_str("        </div>\n    </div>\n</section>\n");
    html
}

fn render_products() -> String {
    let mut html = String::new();
    html.push_str("<section id=\"product-catalog\">\n");
    html.push_str(&format!("    <h2>{} Product Catalog</h2>\n", BRAND));
    html.push_str("    <div class=\"grid\">\n");
    for product in PRODUCTS {
        html.push_str(&render_product(product));
    }
    html.push_str("    </div>\n</section>\n");
    html
}

fn render_product(product: &Product) -> String {
    let filled = product.filled_stars();
    let stars: String = (0..5)
        .map(|i| if i < filled { "★" } else { "<span class=\"off\">★</span>" })
        .collect();
    let badge = if product.bestseller {
        "<span class=\"badge\">Bestseller</span>"
    } else {
        ""
    };
    let features: String = product
        .features
        .iter()
        .map(|f| format!("<li>{}</li>", escape_html(f)))
        .collect();

    format!(
        r#"        <div class="card product">
            <div class="card-header">{name}{badge}</div>
            <div class="card-body">
                <p><span class="stars">{stars}</span> <span class="muted">({reviews} reviews)</span></p>
                <img src="{image}" alt="{name}">
                <p>{description}</p>
                <h4>Key Features:</h4>
                <ul class="checklist">{features}</ul>
                <h4>Suitable Crops:</h4>
                <p class="muted">{crops}</p>
                <p class="price">{price}</p>
                <p class="muted">Net Weight: {weight}</p>
                <a class="buy" href="tel:{tel}">Contact to Buy</a>
            </div>
        </div>
"#,
        name = escape_html(product.name),
        badge = badge,
        stars = stars,
        reviews = product.reviews,
        image = escape_html(product.image),
        description = escape_html(product.description),
        features = features,
        crops = escape_html(product.crops),
        price = escape_html(product.price),
        weight = escape_html(product.weight),
        tel = CONTACT.phone_tel,
    )
}

fn render_testimonials() -> String {
    let mut html = String::new();
    html.push_str("<section id=\"testimonials\">\n    <h2>What Farmers Say</h2>\n    <div class=\"grid\">\n");
    for t in TESTIMONIALS {
        html.push_str(&format!(
            "        <div class=\"card\"><div class=\"card-body\"><blockquote>“{}”</blockquote><p class=\"muted\">{}, {}</p></div></div>\n",
            escape_html(t.quote),
            escape_html(t.author),
            escape_html(t.location)
        ));
    }
    html.push_str("    </div>\n</section>\n");
    html
}

fn render_contact() -> String {
    format!(
        r#"<section id="contact">
    <div class="card">
        <div class="card-header">Contact Us</div>
        <div class="card-body grid">
            <div>
                <h3>Get In Touch</h3>
                <p>Have questions about our products or services? Contact our team for assistance.</p>
                <p>📞 <a href="tel:{tel}">{phone}</a></p>
                <p>✉️ <a href="mailto:{email}">{email}</a></p>
                <p>📍 {address}</p>
            </div>
            <div>
                <h3>Send Us a Message</h3>
                <form>
                    <label for="name">Name</label>
                    <input id="name" type="text" placeholder="Your name">
                    <label for="email">Email</label>
                    <input id="email" type="email" placeholder="Your email">
                    <label for="message">Message</label>
                    <textarea id="message" rows="4" placeholder="Your message"></textarea>
                    <button class="primary" type="button">Send Message</button>
                </form>
            </div>
        </div>
    </div>
</section>
"#,
        tel = CONTACT.phone_tel,
        phone = escape_html(CONTACT.phone_display),
        email = escape_html(CONTACT.email),
        address = escape_html(CONTACT.address),
    )
}

fn render_footer(year: i32) -> String {
    format!(
        r##"<footer>
    <div class="inner grid">
        <div>
            <h3>{brand}</h3>
            <p class="muted">Protecting crops with advanced AI technology and sustainable agricultural solutions.</p>
        </div>
        <div>
            <h3>Quick Links</h3>
            <p><a href="#">Home</a> · <a href="#services">Services</a> · <a href="#product-catalog">Products</a> · <a href="#contact">Contact</a></p>
        </div>
    </div>
    <div class="inner copy">&copy; {year} Kaustubhagri. All rights reserved.</div>
</footer>
"##,
        brand = BRAND,
        year = year
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
