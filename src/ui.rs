use crate::models::OverviewView;

pub fn render_index(environment: &str, overview: &OverviewView) -> String {
    INDEX_HTML
        .replace("{{ENV}}", environment)
        .replace("{{TOTAL}}", &overview.total.to_string())
        .replace("{{ACTIVE}}", &overview.active.to_string())
        .replace("{{INACTIVE}}", &overview.inactive.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Onboarding &amp; Booking Metrics</title>
  <style>
    :root {
      --bg: #10141c;
      --panel: #1a2130;
      --line: #2a3447;
      --ink: #e8ecf4;
      --muted: #8a94a8;
      --accent: #4fa3ff;
      --good: #4ad29a;
      --warn: #ff7a6b;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      padding: 28px 20px 48px;
    }

    .wrap {
      width: min(1080px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    header {
      display: flex;
      align-items: baseline;
      justify-content: space-between;
      gap: 12px;
      flex-wrap: wrap;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
      font-weight: 600;
    }

    .env {
      color: var(--muted);
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
    }

    #banner {
      display: none;
      background: rgba(255, 122, 107, 0.12);
      border: 1px solid var(--warn);
      color: var(--warn);
      border-radius: 10px;
      padding: 10px 14px;
      font-size: 0.9rem;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 14px;
    }

    .card, .panel {
      background: var(--panel);
      border: 1px solid var(--line);
      border-radius: 14px;
      padding: 16px;
    }

    .card .label {
      color: var(--muted);
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
    }

    .card .value {
      font-size: 1.8rem;
      font-weight: 600;
      margin-top: 6px;
    }

    .card .value.active { color: var(--good); }
    .card .value.inactive { color: var(--warn); }

    .panel h2 {
      margin: 0 0 12px;
      font-size: 1.05rem;
      font-weight: 600;
    }

    .tabs {
      display: inline-flex;
      gap: 6px;
      margin-bottom: 12px;
    }

    .tabs button {
      background: transparent;
      border: 1px solid var(--line);
      color: var(--muted);
      border-radius: 8px;
      padding: 5px 12px;
      cursor: pointer;
      font: inherit;
      font-size: 0.85rem;
    }

    .tabs button.on {
      border-color: var(--accent);
      color: var(--accent);
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.88rem;
    }

    th, td {
      text-align: left;
      padding: 7px 8px;
      border-bottom: 1px solid var(--line);
      white-space: nowrap;
    }

    th {
      color: var(--muted);
      font-weight: 500;
      font-size: 0.78rem;
      text-transform: uppercase;
      letter-spacing: 0.06em;
    }

    td.num, th.num { text-align: right; }

    .bar {
      display: inline-block;
      height: 10px;
      background: var(--accent);
      border-radius: 3px;
      vertical-align: middle;
      margin-right: 8px;
    }

    .grid-2 {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 20px;
    }

    @media (max-width: 760px) {
      .grid-2 { grid-template-columns: 1fr; }
    }

    .muted { color: var(--muted); }

    #refresh {
      background: var(--accent);
      border: none;
      color: #0b1520;
      border-radius: 8px;
      padding: 8px 16px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
    }

    #refresh:disabled { opacity: 0.5; cursor: wait; }
  </style>
</head>
<body>
  <div class="wrap">
    <header>
      <div>
        <h1>Onboarding &amp; Booking Metrics</h1>
        <span class="env">{{ENV}}</span>
      </div>
      <div>
        <span id="fetched" class="muted"></span>
        <button id="refresh">Refresh</button>
      </div>
    </header>

    <div id="banner"></div>

    <section class="cards">
      <div class="card"><span class="label">Total users</span><div class="value" id="m-total">{{TOTAL}}</div></div>
      <div class="card"><span class="label">Active</span><div class="value active" id="m-active">{{ACTIVE}}</div></div>
      <div class="card"><span class="label">Inactive</span><div class="value inactive" id="m-inactive">{{INACTIVE}}</div></div>
      <div class="card"><span class="label">New last 30d</span><div class="value" id="m-new30">&ndash;</div></div>
      <div class="card"><span class="label">Bookings 30d</span><div class="value" id="m-bookings">&ndash;</div></div>
    </section>

    <section class="panel">
      <h2>New users</h2>
      <div class="tabs" id="period-tabs">
        <button data-period="24h">24 hours</button>
        <button data-period="7d" class="on">7 days</button>
        <button data-period="30d">30 days</button>
      </div>
      <div id="period-summary" class="muted"></div>
      <table>
        <thead><tr><th>Name</th><th>ID</th><th>Joined</th><th>Occupation</th></tr></thead>
        <tbody id="period-rows"></tbody>
      </table>
    </section>

    <div class="grid-2">
      <section class="panel">
        <h2>Countries (last 30 days)</h2>
        <table>
          <thead><tr><th>Country</th><th class="num">New users</th></tr></thead>
          <tbody id="country-rows"></tbody>
        </table>
        <p class="muted" id="map-note"></p>
      </section>

      <section class="panel">
        <h2>Top providers by revenue</h2>
        <table>
          <thead><tr><th>Provider</th><th class="num">Revenue</th></tr></thead>
          <tbody id="provider-rows"></tbody>
        </table>
        <h2 style="margin-top:18px">Bookings per day</h2>
        <table>
          <tbody id="daily-rows"></tbody>
        </table>
      </section>
    </div>

    <section class="panel">
      <h2>Recent bookings</h2>
      <table>
        <thead><tr><th>ID</th><th>Status</th><th>Type</th><th class="num">Price</th><th>From</th><th>To</th><th>Customer</th><th>Provider</th></tr></thead>
        <tbody id="booking-rows"></tbody>
      </table>
    </section>
  </div>

  <script>
    const banner = document.getElementById('banner');
    let activePeriod = '7d';

    function esc(value) {
      const div = document.createElement('div');
      div.textContent = value == null ? '' : String(value);
      return div.innerHTML;
    }

    function showError(message) {
      banner.textContent = message;
      banner.style.display = 'block';
    }

    function clearError() {
      banner.style.display = 'none';
    }

    async function getJson(path) {
      const response = await fetch(path);
      if (!response.ok) {
        throw new Error(await response.text() || ('HTTP ' + response.status));
      }
      return response.json();
    }

    async function loadOverview() {
      const view = await getJson('/api/overview');
      document.getElementById('m-total').textContent = view.total;
      document.getElementById('m-active').textContent = view.active;
      document.getElementById('m-inactive').textContent = view.inactive;
    }

    async function loadPeriod() {
      const view = await getJson('/api/periods/' + activePeriod);
      document.getElementById('period-summary').textContent =
        view.count + ' new (' + view.by_type.customer + ' customers, ' +
        view.by_type.artist + ' artists, ' + view.by_type.business + ' businesses)';
      document.getElementById('period-rows').innerHTML = view.preview.map(row =>
        '<tr><td>' + esc(row.display_name) + '</td><td>' + esc(row.user_id) +
        '</td><td>' + esc(row.created) + '</td><td>' + esc(row.occupation) + '</td></tr>'
      ).join('');
    }

    async function loadCountries() {
      const view = await getJson('/api/countries');
      document.getElementById('m-new30').textContent = view.total_new_30d;
      const max = Math.max(1, ...view.per_country_breakdown.map(row => row.total));
      document.getElementById('country-rows').innerHTML = view.per_country_breakdown.map(row =>
        '<tr><td><span class="bar" style="width:' + Math.round(80 * row.total / max) +
        'px"></span>' + esc(row.country) + '</td><td class="num">' + row.total + '</td></tr>'
      ).join('');
      document.getElementById('map-note').textContent =
        view.map_points.length + ' recent signups with map coordinates';
    }

    async function loadBookings() {
      const view = await getJson('/api/bookings');
      document.getElementById('m-bookings').textContent = view.total;
      const prefix = view.currency_label ? view.currency_label + ' ' : '';
      document.getElementById('provider-rows').innerHTML = view.top_providers.map(row =>
        '<tr><td>' + esc(row.provider) + '</td><td class="num">' + prefix +
        row.revenue.toFixed(2) + '</td></tr>'
      ).join('');
      const max = Math.max(1, ...view.daily_counts.map(row => row.count));
      document.getElementById('daily-rows').innerHTML = view.daily_counts.map(row =>
        '<tr><td>' + esc(row.date) + '</td><td><span class="bar" style="width:' +
        Math.round(120 * row.count / max) + 'px"></span>' + row.count + '</td></tr>'
      ).join('');
      document.getElementById('booking-rows').innerHTML = view.preview_rows.map(row =>
        '<tr><td>' + esc(row.booking_id) + '</td><td>' + esc(row.status) + '</td><td>' +
        esc(row.booking_type) + '</td><td class="num">' + prefix + row.total_price.toFixed(2) +
        '</td><td>' + esc(row.from_time) + '</td><td>' + esc(row.to_time) + '</td><td>' +
        esc(row.customer_name) + '</td><td>' + esc(row.service_provider_name) + '</td></tr>'
      ).join('');
    }

    async function loadAll() {
      clearError();
      try {
        await Promise.all([loadOverview(), loadPeriod(), loadCountries(), loadBookings()]);
      } catch (err) {
        showError(err.message);
      }
    }

    document.getElementById('period-tabs').addEventListener('click', event => {
      const button = event.target.closest('button');
      if (!button) return;
      activePeriod = button.dataset.period;
      for (const other of document.querySelectorAll('#period-tabs button')) {
        other.classList.toggle('on', other === button);
      }
      loadPeriod().catch(err => showError(err.message));
    });

    document.getElementById('refresh').addEventListener('click', async () => {
      const button = document.getElementById('refresh');
      button.disabled = true;
      clearError();
      try {
        const response = await fetch('/api/refresh', { method: 'POST' });
        if (!response.ok) {
          throw new Error(await response.text() || ('HTTP ' + response.status));
        }
        const body = await response.json();
        document.getElementById('fetched').textContent = 'Fetched ' + body.fetched_at;
        await loadAll();
      } catch (err) {
        showError(err.message);
      } finally {
        button.disabled = false;
      }
    });

    loadAll();
  </script>
</body>
</html>
"#;
