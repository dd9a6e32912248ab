
/// Product page carrying every field the extractor knows about
pub(crate) const PRODUCT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Example Module</title>
  <meta name="description" content="A module that does things">
  <script>var psuser_assistance_track_event_params = {"id_product":123,"name":"x"};</script>
  <script type="application/ld+json">{"@type":"Product","name":"Example Module"}</script>
  <script type="application/ld+json">
    {"@context":"https://schema.org","@type":"BreadcrumbList","itemListElement":[
      {"@type":"ListItem","position":1,"item":{"@id":"https://addons.prestashop.com/fr/2-modules","name":"Modules"}},
      {"@type":"ListItem","position":2,"item":{"@id":"https://addons.prestashop.com/fr/481-paiement","name":"Payment"}}
    ]}
  </script>
</head>
<body>
  <script>window.product = {"price":9.99,"currency":"EUR"};</script>
  <h1>Example Module <span class="module__title-version puik-body">v2.1.0</span></h1>
  <a id="ps_link_manufacturer" title="Acme Dev" href="/acme">Acme</a>
  <div class="module__infos">
    <div class="row">
      <div class="label">Version de PrestaShop requise</div>
      <div class="value">8.0.0 - 8.1.4</div>
    </div>
    <div class="row">
      <div class="label">Compatibilité multiboutique</div>
      <div class="value">Oui</div>
    </div>
    <div class="row">
      <div class="label">Contient des surcharges</div>
      <div class="value">Non</div>
    </div>
    <div class="row">
      <div class="label">Dernière mise à jour</div>
      <div class="value">12/03/2024</div>
    </div>
    <div class="row">
      <div class="label">Date de publication</div>
      <div class="value">01/02/2020</div>
    </div>
  </div>
  <div class="ui-text-collapse collapsed product-description__content puik-body-large"><div><p>Main description</p></div></div>
  <div class="ui-text-collapse collapsed product-description__content puik-body-large"><div><ul><li>Feature A</li></ul></div></div>
  <img src="https://addons.prestashop.com/img/cover.jpg">
  <img src="https://cdn.other.com/ad.png">
  <img src="https://addons.prestashop.com/img/shot-1.jpg">
  <img src="https://addons.prestashop.com/img/cover.jpg">
</body>
</html>"#;
