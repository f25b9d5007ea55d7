//! Static site content: products, services, testimonials and contact details.

#[derive(Debug, Clone, Copy)]
pub struct Product {
    pub name: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    pub image: &'static str,
    pub weight: &'static str,
    pub crops: &'static str,
    pub features: &'static [&'static str],
    pub rating: f32,
    pub reviews: u32,
    pub bestseller: bool,
}

impl Product {
    /// Filled stars out of five, rounding the rating down.
    pub fn filled_stars(&self) -> usize {
        (self.rating.max(0.0).floor() as usize).min(5)
    }
}

pub const PRODUCTS: &[Product] = &[
    Product {
        name: "Organic Micro Complex",
        description: "Natural power to soil with a perfect blend of organic nutrients. Contains Humic Acid (12%), Fulvic Acid (8%), Seaweed Extract (7%), and Amino Acid (5%).",
        price: "₹1450",
        image: "/static/micro-complex.jpeg",
        weight: "25 kg",
        crops: "Complete nutrition for all types of vegetables, fruits, and grains. Enhances soil fertility and crop yield.",
        features: &[
            "100% Natural Products",
            "Organic Matter: 62%",
            "Protein: 5%",
            "Agricultural Grade",
        ],
        rating: 4.8,
        reviews: 124,
        bestseller: true,
    },
    Product {
        name: "Farming Vita",
        description: "Organic fertilizer that provides essential nutrients for healthy crop growth. ISO 9001:2008 certified product.",
        price: "₹1450",
        image: "/static/farming-vita.jpeg",
        weight: "25 kg",
        crops: "Suitable for all agricultural crops, especially effective during peanut stage.",
        features: &[
            "100% Guaranteed Quality",
            "Organic Manure",
            "Best Quality",
        ],
        rating: 4.5,
        reviews: 86,
        bestseller: false,
    },
];

#[derive(Debug, Clone, Copy)]
pub struct ServiceStep {
    pub title: &'static str,
    pub description: &'static str,
}

pub const DETECTION_STEPS: &[ServiceStep] = &[
    ServiceStep {
        title: "Step 1: Upload a Clear Image",
        description: "Take a photo of the affected crop using your smartphone or upload an existing image. Ensure good lighting for the best results.",
    },
    ServiceStep {
        title: "Step 2: AI Analysis",
        description: "Our advanced AI scans your image, detects potential diseases, and compares them with a vast agricultural database for accurate identification.",
    },
    ServiceStep {
        title: "Step 3: Get Instant Results",
        description: "Receive a detailed report with disease identification, severity analysis, and expert-recommended treatment options.",
    },
];

pub const ORGANIC_SOLUTIONS: &[&str] = &[
    "Natural pest control methods using beneficial insects",
    "Plant-based extracts and oils for disease management",
    "Soil health improvement recommendations",
];

pub const CHEMICAL_SOLUTIONS: &[&str] = &[
    "Targeted fungicides for specific crop diseases",
    "Insecticides for pest management with safety guidelines",
    "Balanced fertilizer recommendations",
];

#[derive(Debug, Clone, Copy)]
pub struct Testimonial {
    pub author: &'static str,
    pub location: &'static str,
    pub quote: &'static str,
}

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        author: "Ramesh Patil",
        location: "Nashik",
        quote: "The photo check told me my tomatoes had early blight before it spread across the field.",
    },
    Testimonial {
        author: "Sunita Deshmukh",
        location: "Jalgaon",
        quote: "Organic Micro Complex brought my banana plot back to health in one season.",
    },
    Testimonial {
        author: "Anil Jadhav",
        location: "Satara",
        quote: "Clear treatment steps in my own language. Farming Vita is now part of every sowing.",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct ContactInfo {
    pub phone_display: &'static str,
    pub phone_tel: &'static str,
    pub email: &'static str,
    pub address: &'static str,
    pub whatsapp_channel: &'static str,
}

pub const CONTACT: ContactInfo = ContactInfo {
    phone_display: "+91 9679670701",
    phone_tel: "9679670701",
    email: "info@KaustubhAgri.com",
    address: "123 Farming Road, Agricultural District",
    whatsapp_channel: "https://whatsapp.com/channel/0029VbAMsWv7DAWwU1wdRi17",
};

pub const LANGUAGES: &[&str] = &["english", "hindi", "marathi", "gujarati", "kannada", "telugu", "tamil"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_count_rounds_down() {
        assert_eq!(PRODUCTS[0].filled_stars(), 4);
        assert_eq!(PRODUCTS[1].filled_stars(), 4);
    }

    #[test]
    fn english_is_offered() {
        assert!(LANGUAGES.contains(&crate::prompts::DEFAULT_LANGUAGE));
    }
}
